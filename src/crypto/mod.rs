pub mod aes_ctr_cipher;
pub mod block_cipher;
pub mod block_ctr_cipher;
pub mod cipher_error;
pub mod cipher_provider;
pub mod ctr_cipher;
pub mod f8_cipher;
pub mod hmac_sha1;
pub mod openssl_block_cipher;
pub mod openssl_ctr_cipher;
pub mod rust_crypto_block_cipher;

pub use block_cipher::{BLOCK_SIZE, BlockAlgorithm, BlockCipher};
pub use cipher_error::CipherError;
pub use cipher_provider::{CipherBackend, CipherProvider};
pub use ctr_cipher::CtrCipher;
pub use f8_cipher::F8Cipher;
pub use hmac_sha1::{HMAC_SHA1_LEN, HmacSha1Authenticator, PacketAuthenticator, constant_time_eq};
