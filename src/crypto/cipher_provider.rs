use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::RngCore;

use crate::config::{BackendPreference, SrtpSettings};
use crate::crypto::aes_ctr_cipher::AesCtrCipher;
use crate::crypto::block_cipher::{BLOCK_SIZE, BlockAlgorithm, BlockCipher};
use crate::crypto::block_ctr_cipher::BlockCtrCipher;
use crate::crypto::cipher_error::CipherError;
use crate::crypto::ctr_cipher::CtrCipher;
use crate::crypto::f8_cipher::F8Cipher;
use crate::crypto::openssl_block_cipher::OpenSslAesBlockCipher;
use crate::crypto::openssl_ctr_cipher::OpenSslCtrCipher;
use crate::crypto::rust_crypto_block_cipher::{AesBlockCipher, TwofishBlockCipher};
use crate::log::log_sink::LogSink;
use crate::{sink_info, sink_warn};

/// Blocks pushed through each backend when benchmarking.
const BENCHMARK_BLOCKS: usize = 1024;
const BENCHMARK_KEY_LEN: usize = 16;

/// Where AES work is done. Twofish is always software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherBackend {
    RustCrypto,
    OpenSsl,
}

impl CipherBackend {
    pub const ALL: [CipherBackend; 2] = [CipherBackend::OpenSsl, CipherBackend::RustCrypto];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CipherBackend::RustCrypto => "rustcrypto",
            CipherBackend::OpenSsl => "openssl",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rustcrypto" | "rust" | "software" => Some(CipherBackend::RustCrypto),
            "openssl" | "native" => Some(CipherBackend::OpenSsl),
            _ => None,
        }
    }

    /// Runs the FIPS-197 AES-128 known-answer test on this backend.
    #[must_use]
    pub fn probe(self) -> bool {
        const KEY: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        const PLAIN: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        const CIPHER: [u8; 16] = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];

        let mut cipher = aes_block_cipher(self);
        let mut block = PLAIN;
        cipher.init(&KEY).is_ok() && cipher.encrypt_block(&mut block).is_ok() && block == CIPHER
    }
}

impl fmt::Display for CipherBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn aes_block_cipher(backend: CipherBackend) -> Box<dyn BlockCipher> {
    match backend {
        CipherBackend::RustCrypto => Box::new(AesBlockCipher::new()),
        CipherBackend::OpenSsl => Box::new(OpenSslAesBlockCipher::new()),
    }
}

fn aes_ctr_cipher(backend: CipherBackend) -> Box<dyn CtrCipher> {
    match backend {
        CipherBackend::RustCrypto => Box::new(AesCtrCipher::new()),
        CipherBackend::OpenSsl => Box::new(OpenSslCtrCipher::new()),
    }
}

/// Process-wide cipher factory. Build one at startup, wrap it in an `Arc` and
/// hand it to every context factory; the backend never changes afterwards.
pub struct CipherProvider {
    backend: CipherBackend,
}

impl fmt::Debug for CipherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherProvider")
            .field("backend", &self.backend)
            .finish()
    }
}

impl CipherProvider {
    /// Prefers OpenSSL when its known-answer test passes, else RustCrypto.
    pub fn new(logger: &Arc<dyn LogSink>) -> Self {
        let backend = if CipherBackend::OpenSsl.probe() {
            CipherBackend::OpenSsl
        } else {
            sink_warn!(logger, "[SRTP] OpenSSL AES failed its self test, using RustCrypto");
            CipherBackend::RustCrypto
        };
        sink_info!(logger, "[SRTP] Will employ AES implemented by {}", backend);
        Self { backend }
    }

    /// # Errors
    /// [`CipherError::BackendUnavailable`] when the backend fails its self test.
    pub fn with_backend(
        backend: CipherBackend,
        logger: &Arc<dyn LogSink>,
    ) -> Result<Self, CipherError> {
        if !backend.probe() {
            return Err(CipherError::BackendUnavailable(backend.name()));
        }
        sink_info!(logger, "[SRTP] Will employ AES implemented by {}", backend);
        Ok(Self { backend })
    }

    /// Times every working backend over the same random input and keeps the
    /// fastest.
    pub fn benchmark(logger: &Arc<dyn LogSink>) -> Self {
        let mut rng = rand::thread_rng();
        let mut key = [0u8; BENCHMARK_KEY_LEN];
        let mut input = vec![0u8; BENCHMARK_BLOCKS * BLOCK_SIZE];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut input);
        let mut iv = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut iv[..14]);

        let mut results: Vec<(CipherBackend, &'static str, Duration)> = Vec::new();
        for backend in CipherBackend::ALL {
            if !backend.probe() {
                continue;
            }
            let mut ctr = aes_ctr_cipher(backend);
            if ctr.init(&key).is_err() {
                continue;
            }
            let mut buf = input.clone();
            let len = buf.len();
            let start = Instant::now();
            if ctr.process(&mut buf, 0, len, &iv).is_ok() {
                results.push((backend, ctr.backend_name(), start.elapsed()));
            }
        }

        let summary = results
            .iter()
            .map(|(b, name, t)| format!("{b} ({name}) {}", t.as_nanos()))
            .collect::<Vec<_>>()
            .join(", ");
        sink_info!(logger, "[SRTP] AES benchmark (ns): {}", summary);

        let backend = results
            .iter()
            .min_by_key(|(_, _, t)| *t)
            .map_or(CipherBackend::RustCrypto, |(b, _, _)| *b);
        sink_info!(logger, "[SRTP] Will employ AES implemented by {}", backend);
        Self { backend }
    }

    /// Builds the provider a `[Srtp]` config section asks for.
    ///
    /// # Errors
    /// [`CipherError::BackendUnavailable`] if a fixed backend fails its self test.
    pub fn from_settings(
        settings: &SrtpSettings,
        logger: &Arc<dyn LogSink>,
    ) -> Result<Self, CipherError> {
        match settings.cipher_backend {
            BackendPreference::Fixed(backend) => Self::with_backend(backend, logger),
            BackendPreference::Auto if settings.benchmark => Ok(Self::benchmark(logger)),
            BackendPreference::Auto => Ok(Self::new(logger)),
        }
    }

    #[must_use]
    pub fn backend(&self) -> CipherBackend {
        self.backend
    }

    /// An unkeyed block cipher.
    #[must_use]
    pub fn block_cipher(&self, algorithm: BlockAlgorithm) -> Box<dyn BlockCipher> {
        match algorithm {
            BlockAlgorithm::Aes => aes_block_cipher(self.backend),
            BlockAlgorithm::Twofish => Box::new(TwofishBlockCipher::new()),
        }
    }

    /// An unkeyed Counter Mode cipher.
    #[must_use]
    pub fn ctr_cipher(&self, algorithm: BlockAlgorithm) -> Box<dyn CtrCipher> {
        match algorithm {
            BlockAlgorithm::Aes => aes_ctr_cipher(self.backend),
            BlockAlgorithm::Twofish => Box::new(BlockCtrCipher::new(Box::new(
                TwofishBlockCipher::new(),
            ))),
        }
    }

    /// An unkeyed F8 Mode cipher.
    #[must_use]
    pub fn f8_cipher(&self, algorithm: BlockAlgorithm) -> F8Cipher {
        F8Cipher::new(self.block_cipher(algorithm), self.block_cipher(algorithm))
    }
}
