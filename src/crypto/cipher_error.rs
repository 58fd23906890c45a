use std::fmt;

use openssl::error::ErrorStack;

/// Contract violations and backend failures of the cipher primitives.
///
/// These never describe a bad packet; they mean the caller passed arguments
/// that no well-formed SRTP context would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    InvalidKeyLength { algorithm: &'static str, len: usize },
    InvalidIvLength(usize),
    OutOfBounds { offset: usize, len: usize, buf_len: usize },
    TooManyBlocks(usize),
    InvalidSaltLength { salt_len: usize, key_len: usize },
    NotInitialized,
    Backend(String),
    BackendUnavailable(&'static str),
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CipherError::*;
        match self {
            InvalidKeyLength { algorithm, len } => {
                write!(f, "invalid {algorithm} key length: {len} bytes")
            }
            InvalidIvLength(len) => write!(f, "IV must be 16 bytes, got {len}"),
            OutOfBounds {
                offset,
                len,
                buf_len,
            } => write!(
                f,
                "region {offset}..{} exceeds buffer of {buf_len} bytes",
                offset.saturating_add(*len)
            ),
            TooManyBlocks(blocks) => {
                write!(f, "{blocks} blocks exceed the 2^16 block keystream limit")
            }
            InvalidSaltLength { salt_len, key_len } => write!(
                f,
                "F8 salt of {salt_len} bytes is longer than the {key_len}-byte key"
            ),
            NotInitialized => write!(f, "cipher used before init"),
            Backend(msg) => write!(f, "cipher backend error: {msg}"),
            BackendUnavailable(name) => write!(f, "cipher backend {name} is unavailable"),
        }
    }
}

impl std::error::Error for CipherError {}

impl From<ErrorStack> for CipherError {
    fn from(e: ErrorStack) -> Self {
        CipherError::Backend(format!("{e}"))
    }
}
