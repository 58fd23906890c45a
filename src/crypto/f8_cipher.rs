use std::iter;

use zeroize::Zeroizing;

use crate::crypto::block_cipher::{BLOCK_SIZE, BlockCipher};
use crate::crypto::cipher_error::CipherError;
use crate::crypto::ctr_cipher::checked_region;

const SALT_PAD: u8 = 0x55;

/// F8 Mode (RFC 3711 §4.1.2) over a pair of block ciphers of the same
/// algorithm: one keyed with the session key, one with the salt-masked key.
pub struct F8Cipher {
    cipher: Box<dyn BlockCipher>,
    masked: Box<dyn BlockCipher>,
    keyed: bool,
}

impl F8Cipher {
    pub fn new(cipher: Box<dyn BlockCipher>, masked: Box<dyn BlockCipher>) -> Self {
        Self {
            cipher,
            masked,
            keyed: false,
        }
    }

    /// Keys both ciphers. The masking key is `key XOR (salt || 0x55 0x55 ..)`.
    ///
    /// # Errors
    /// [`CipherError::InvalidSaltLength`] if the salt is longer than the key,
    /// or whatever the block ciphers report for the key itself.
    pub fn init(&mut self, key: &[u8], salt: &[u8]) -> Result<(), CipherError> {
        if salt.len() > key.len() {
            return Err(CipherError::InvalidSaltLength {
                salt_len: salt.len(),
                key_len: key.len(),
            });
        }
        let mask: Zeroizing<Vec<u8>> = Zeroizing::new(
            key.iter()
                .zip(salt.iter().copied().chain(iter::repeat(SALT_PAD)))
                .map(|(k, m)| k ^ m)
                .collect(),
        );
        self.masked.init(&mask)?;
        self.cipher.init(key)?;
        self.keyed = true;
        Ok(())
    }

    /// XORs the F8 keystream for `iv` into `data[offset..offset + len]`.
    ///
    /// # Errors
    /// Same argument contract as [`CtrCipher::process`](crate::crypto::CtrCipher::process).
    pub fn process(
        &mut self,
        data: &mut [u8],
        offset: usize,
        len: usize,
        iv: &[u8],
    ) -> Result<(), CipherError> {
        let (region, iv) = checked_region(data, offset, len, iv)?;
        if !self.keyed {
            return Err(CipherError::NotInitialized);
        }

        let mut iv_prime = iv;
        self.masked.encrypt_block(&mut iv_prime)?;

        let mut stream = [0u8; BLOCK_SIZE];
        let mut j: u32 = 0;
        for chunk in region.chunks_mut(BLOCK_SIZE) {
            for (s, v) in stream.iter_mut().zip(iv_prime.iter()) {
                *s ^= v;
            }
            for (s, c) in stream[12..].iter_mut().zip(j.to_be_bytes()) {
                *s ^= c;
            }
            j = j.wrapping_add(1);
            self.cipher.encrypt_block(&mut stream)?;

            for (b, s) in chunk.iter_mut().zip(stream.iter()) {
                *b ^= s;
            }
        }
        Ok(())
    }
}
