use openssl::symm::{Cipher, Crypter, Mode};

use crate::crypto::block_cipher::{BLOCK_SIZE, BlockAlgorithm, BlockCipher};
use crate::crypto::cipher_error::CipherError;

pub(crate) fn aes_ecb_for_key(len: usize) -> Result<Cipher, CipherError> {
    match len {
        16 => Ok(Cipher::aes_128_ecb()),
        24 => Ok(Cipher::aes_192_ecb()),
        32 => Ok(Cipher::aes_256_ecb()),
        other => Err(CipherError::InvalidKeyLength {
            algorithm: BlockAlgorithm::Aes.name(),
            len: other,
        }),
    }
}

/// AES through OpenSSL's EVP interface in ECB mode without padding.
#[derive(Default)]
pub struct OpenSslAesBlockCipher {
    crypter: Option<Crypter>,
}

impl OpenSslAesBlockCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for OpenSslAesBlockCipher {
    fn algorithm(&self) -> BlockAlgorithm {
        BlockAlgorithm::Aes
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        let cipher = aes_ecb_for_key(key.len())?;
        let mut crypter = Crypter::new(cipher, Mode::Encrypt, key, None)?;
        crypter.pad(false);
        self.crypter = Some(crypter);
        Ok(())
    }

    fn encrypt_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<(), CipherError> {
        let crypter = self.crypter.as_mut().ok_or(CipherError::NotInitialized)?;
        // EVP wants room for one extra block even when padding is off.
        let mut out = [0u8; 2 * BLOCK_SIZE];
        let n = crypter.update(&block[..], &mut out)?;
        if n != BLOCK_SIZE {
            return Err(CipherError::Backend(format!(
                "ECB update produced {n} bytes"
            )));
        }
        block.copy_from_slice(&out[..BLOCK_SIZE]);
        Ok(())
    }
}
