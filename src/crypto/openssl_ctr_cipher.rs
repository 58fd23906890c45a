use openssl::symm::{Cipher, Crypter, Mode};
use zeroize::Zeroizing;

use crate::crypto::block_cipher::{BLOCK_SIZE, BlockAlgorithm};
use crate::crypto::cipher_error::CipherError;
use crate::crypto::ctr_cipher::{CtrCipher, checked_region, counter_segments};

fn aes_ctr_for_key(len: usize) -> Result<Cipher, CipherError> {
    match len {
        16 => Ok(Cipher::aes_128_ctr()),
        24 => Ok(Cipher::aes_192_ctr()),
        32 => Ok(Cipher::aes_256_ctr()),
        other => Err(CipherError::InvalidKeyLength {
            algorithm: BlockAlgorithm::Aes.name(),
            len: other,
        }),
    }
}

/// AES Counter Mode run natively by OpenSSL.
#[derive(Default)]
pub struct OpenSslCtrCipher {
    key: Option<Zeroizing<Vec<u8>>>,
    scratch: Vec<u8>,
}

impl OpenSslCtrCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CtrCipher for OpenSslCtrCipher {
    fn backend_name(&self) -> &'static str {
        "openssl-ctr"
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        aes_ctr_for_key(key.len())?;
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
        let cipher = aes_ctr_for_key(key.len())?;

        for (range, seg_iv) in counter_segments(&iv, region.len()) {
            let seg = &mut region[range];
            let mut crypter = Crypter::new(cipher, Mode::Encrypt, key, Some(&seg_iv[..]))?;
            self.scratch.clear();
            self.scratch.resize(seg.len() + BLOCK_SIZE, 0);
            let mut n = crypter.update(seg, &mut self.scratch)?;
            n += crypter.finalize(&mut self.scratch[n..])?;
            if n != seg.len() {
                return Err(CipherError::Backend(format!(
                    "CTR produced {n} bytes for a {} byte segment",
                    seg.len()
                )));
            }
            seg.copy_from_slice(&self.scratch[..n]);
        }
        Ok(())
    }
}
