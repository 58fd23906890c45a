use std::ops::Range;

use crate::crypto::block_cipher::BLOCK_SIZE;
use crate::crypto::cipher_error::CipherError;

/// RFC 3711 caps one keystream at 2^16 blocks: only the low 16 counter bits move.
pub const MAX_BLOCKS: usize = 1 << 16;

/// Counter Mode keystream generator. Encryption and decryption are the same
/// call since the keystream is XORed into the data.
pub trait CtrCipher: Send {
    /// Short backend label, used in logs and benchmarks.
    fn backend_name(&self) -> &'static str;

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError>;

    /// XORs the keystream starting at counter block `iv` into
    /// `data[offset..offset + len]`.
    ///
    /// # Errors
    /// [`CipherError::InvalidIvLength`] unless `iv` is 16 bytes,
    /// [`CipherError::OutOfBounds`] if the region leaves `data`, and
    /// [`CipherError::TooManyBlocks`] for more than 2^16 blocks.
    fn process(
        &mut self,
        data: &mut [u8],
        offset: usize,
        len: usize,
        iv: &[u8],
    ) -> Result<(), CipherError>;
}

/// Validates the arguments of a `process` call and returns the region to
/// transform plus the IV as a fixed-size block.
pub(crate) fn checked_region<'a>(
    data: &'a mut [u8],
    offset: usize,
    len: usize,
    iv: &[u8],
) -> Result<(&'a mut [u8], [u8; BLOCK_SIZE]), CipherError> {
    let iv: [u8; BLOCK_SIZE] = iv
        .try_into()
        .map_err(|_| CipherError::InvalidIvLength(iv.len()))?;
    let buf_len = data.len();
    let end = offset
        .checked_add(len)
        .filter(|end| *end <= buf_len)
        .ok_or(CipherError::OutOfBounds {
            offset,
            len,
            buf_len,
        })?;
    let blocks = len.div_ceil(BLOCK_SIZE);
    if blocks > MAX_BLOCKS {
        return Err(CipherError::TooManyBlocks(blocks));
    }
    Ok((&mut data[offset..end], iv))
}

/// Adds one to the low 16 bits of a counter block, wrapping within them.
#[inline]
pub(crate) fn increment_counter(block: &mut [u8; BLOCK_SIZE]) {
    let next = u16::from_be_bytes([block[14], block[15]]).wrapping_add(1);
    block[14..].copy_from_slice(&next.to_be_bytes());
}

/// Splits a region of `len` bytes into runs that never cross a 16-bit counter
/// wrap, each paired with its starting counter block.
///
/// Library counters carry into the upper 112 bits; restarting them at every
/// wrap keeps them equal to the 16-bit SRTP counter.
pub(crate) fn counter_segments(
    iv: &[u8; BLOCK_SIZE],
    len: usize,
) -> Vec<(Range<usize>, [u8; BLOCK_SIZE])> {
    let mut segments = Vec::with_capacity(2);
    let mut seg_iv = *iv;
    let mut start = 0;
    while start < len {
        let counter = usize::from(u16::from_be_bytes([seg_iv[14], seg_iv[15]]));
        let room = (MAX_BLOCKS - counter) * BLOCK_SIZE;
        let end = len.min(start + room);
        segments.push((start..end, seg_iv));
        seg_iv[14] = 0;
        seg_iv[15] = 0;
        start = end;
    }
    segments
}
