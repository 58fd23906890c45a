use aes::cipher::{KeyIvInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};
use ctr::Ctr128BE;
use zeroize::Zeroizing;

use crate::crypto::block_cipher::{BLOCK_SIZE, BlockAlgorithm};
use crate::crypto::cipher_error::CipherError;
use crate::crypto::ctr_cipher::{CtrCipher, checked_region, counter_segments};

type Aes128Ctr = Ctr128BE<Aes128>;
type Aes192Ctr = Ctr128BE<Aes192>;
type Aes256Ctr = Ctr128BE<Aes256>;

/// AES Counter Mode on the RustCrypto `ctr` crate.
#[derive(Default)]
pub struct AesCtrCipher {
    key: Option<Zeroizing<Vec<u8>>>,
}

impl AesCtrCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply<C: KeyIvInit + StreamCipher>(
    key: &[u8],
    iv: &[u8; BLOCK_SIZE],
    buf: &mut [u8],
) -> Result<(), CipherError> {
    let mut cipher = C::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength {
        algorithm: BlockAlgorithm::Aes.name(),
        len: key.len(),
    })?;
    cipher.apply_keystream(buf);
    Ok(())
}

impl CtrCipher for AesCtrCipher {
    fn backend_name(&self) -> &'static str {
        "rustcrypto-ctr"
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        BlockAlgorithm::Aes.check_key_len(key.len())?;
        self.key = Some(Zeroizing::new(key.to_vec()));
        Ok(())
    }

    fn process(
        &mut self,
        data: &mut [u8],
        offset: usize,
        len: usize,
        iv: &[u8],
    ) -> Result<(), CipherError> {
        let (region, iv) = checked_region(data, offset, len, iv)?;
        let key = self.key.as_ref().ok_or(CipherError::NotInitialized)?;
        for (range, seg_iv) in counter_segments(&iv, region.len()) {
            let seg = &mut region[range];
            match key.len() {
                16 => apply::<Aes128Ctr>(key, &seg_iv, seg)?,
                24 => apply::<Aes192Ctr>(key, &seg_iv, seg)?,
                _ => apply::<Aes256Ctr>(key, &seg_iv, seg)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::crypto::block_ctr_cipher::BlockCtrCipher;
    use crate::crypto::rust_crypto_block_cipher::AesBlockCipher;

    #[test]
    fn rfc3711_b2_keystream() {
        let mut ctr = AesCtrCipher::new();
        ctr.init(&hex::decode("2B7E151628AED2A6ABF7158809CF4F3C").unwrap())
            .unwrap();
        let iv = hex::decode("F0F1F2F3F4F5F6F7F8F9FAFBFCFD0000").unwrap();
        let mut buf = vec![0u8; 32];
        ctr.process(&mut buf, 0, 32, &iv).unwrap();
        assert_eq!(
            hex::encode_upper(&buf),
            "E03EAD0935C95E80E166B16DD92B4EB4D23513162B02D0F72A43A2FE4A5F97AB"
        );
    }

    #[test]
    fn matches_block_driven_ctr_across_counter_wrap() {
        let key = [0x42u8; 24];
        let mut iv = [0x11u8; BLOCK_SIZE];
        iv[14] = 0xFF;
        iv[15] = 0xFD;

        let mut lib = AesCtrCipher::new();
        lib.init(&key).unwrap();
        let mut reference = BlockCtrCipher::new(Box::new(AesBlockCipher::new()));
        reference.init(&key).unwrap();

        let mut a = vec![0u8; 10 * BLOCK_SIZE + 7];
        let mut b = a.clone();
        let n = a.len();
        lib.process(&mut a, 0, n, &iv).unwrap();
        reference.process(&mut b, 0, n, &iv).unwrap();
        assert_eq!(a, b);
    }
}
