use std::fmt;

use crate::crypto::cipher_error::CipherError;

/// Block size shared by AES and Twofish.
pub const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockAlgorithm {
    Aes,
    Twofish,
}

impl BlockAlgorithm {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BlockAlgorithm::Aes => "AES",
            BlockAlgorithm::Twofish => "Twofish",
        }
    }

    /// Both algorithms accept 128, 192 and 256-bit keys.
    pub(crate) fn check_key_len(self, len: usize) -> Result<(), CipherError> {
        match len {
            16 | 24 | 32 => Ok(()),
            _ => Err(CipherError::InvalidKeyLength {
                algorithm: self.name(),
                len,
            }),
        }
    }
}

impl fmt::Display for BlockAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A keyed 128-bit block cipher, used in the encrypt direction only.
pub trait BlockCipher: Send {
    fn algorithm(&self) -> BlockAlgorithm;

    /// (Re)keys the cipher. Calling it again discards the previous key.
    fn init(&mut self, key: &[u8]) -> Result<(), CipherError>;

    /// Encrypts one block in place.
    fn encrypt_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<(), CipherError>;
}
