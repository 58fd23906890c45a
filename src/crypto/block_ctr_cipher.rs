use crate::crypto::block_cipher::{BLOCK_SIZE, BlockCipher};
use crate::crypto::cipher_error::CipherError;
use crate::crypto::ctr_cipher::{CtrCipher, checked_region, increment_counter};

/// Counter Mode driven one block at a time through any [`BlockCipher`].
pub struct BlockCtrCipher {
    cipher: Box<dyn BlockCipher>,
    keyed: bool,
}

impl BlockCtrCipher {
    pub fn new(cipher: Box<dyn BlockCipher>) -> Self {
        Self {
            cipher,
            keyed: false,
        }
    }
}

impl CtrCipher for BlockCtrCipher {
    fn backend_name(&self) -> &'static str {
        "block"
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.cipher.init(key)?;
        self.keyed = true;
        Ok(())
    }

    fn process(
        &mut self,
        data: &mut [u8],
        offset: usize,
        len: usize,
        iv: &[u8],
    ) -> Result<(), CipherError> {
        let (region, mut counter) = checked_region(data, offset, len, iv)?;
        if !self.keyed {
            return Err(CipherError::NotInitialized);
        }
        for chunk in region.chunks_mut(BLOCK_SIZE) {
            let mut keystream = counter;
            self.cipher.encrypt_block(&mut keystream)?;
            for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
                *b ^= k;
            }
            increment_counter(&mut counter);
        }
        Ok(())
    }
}
