use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};
use aes::{Aes128, Aes192, Aes256};
use twofish::Twofish;

use crate::crypto::block_cipher::{BLOCK_SIZE, BlockAlgorithm, BlockCipher};
use crate::crypto::cipher_error::CipherError;

enum AesKeySchedule {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// Software AES from the RustCrypto `aes` crate.
#[derive(Default)]
pub struct AesBlockCipher {
    schedule: Option<AesKeySchedule>,
}

impl AesBlockCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn bad_key(algorithm: BlockAlgorithm, len: usize) -> CipherError {
    CipherError::InvalidKeyLength {
        algorithm: algorithm.name(),
        len,
    }
}

impl BlockCipher for AesBlockCipher {
    fn algorithm(&self) -> BlockAlgorithm {
        BlockAlgorithm::Aes
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        let alg = BlockAlgorithm::Aes;
        let schedule = match key.len() {
            16 => AesKeySchedule::Aes128(
                Aes128::new_from_slice(key).map_err(|_| bad_key(alg, key.len()))?,
            ),
            24 => AesKeySchedule::Aes192(
                Aes192::new_from_slice(key).map_err(|_| bad_key(alg, key.len()))?,
            ),
            32 => AesKeySchedule::Aes256(
                Aes256::new_from_slice(key).map_err(|_| bad_key(alg, key.len()))?,
            ),
            other => return Err(bad_key(alg, other)),
        };
        self.schedule = Some(schedule);
        Ok(())
    }

    fn encrypt_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<(), CipherError> {
        let ga = GenericArray::from_mut_slice(&mut block[..]);
        match self.schedule.as_ref().ok_or(CipherError::NotInitialized)? {
            AesKeySchedule::Aes128(c) => c.encrypt_block(ga),
            AesKeySchedule::Aes192(c) => c.encrypt_block(ga),
            AesKeySchedule::Aes256(c) => c.encrypt_block(ga),
        }
        Ok(())
    }
}

/// Software Twofish from the RustCrypto `twofish` crate.
#[derive(Default)]
pub struct TwofishBlockCipher {
    cipher: Option<Twofish>,
}

impl TwofishBlockCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for TwofishBlockCipher {
    fn algorithm(&self) -> BlockAlgorithm {
        BlockAlgorithm::Twofish
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        let alg = BlockAlgorithm::Twofish;
        alg.check_key_len(key.len())?;
        let cipher = Twofish::new_from_slice(key).map_err(|_| bad_key(alg, key.len()))?;
        self.cipher = Some(cipher);
        Ok(())
    }

    fn encrypt_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<(), CipherError> {
        let cipher = self.cipher.as_ref().ok_or(CipherError::NotInitialized)?;
        cipher.encrypt_block(GenericArray::from_mut_slice(&mut block[..]));
        Ok(())
    }
}
