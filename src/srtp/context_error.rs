use std::fmt;
use std::sync::{MutexGuard, PoisonError};

use crate::crypto::CipherError;

/// Failures building or using a context factory. All of them are caller
/// mistakes (bad key material, bad policy) rather than bad packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    InvalidPolicy(String),
    UnsupportedAuth(&'static str),
    MasterKeyLength { expected: usize, got: usize },
    MasterSaltLength { expected: usize, got: usize },
    KeyLengthMismatch { label: u8, expected: usize, got: usize },
    Cipher(CipherError),
    Closed,
    MutexPoisoned,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ContextError::*;
        match self {
            InvalidPolicy(why) => write!(f, "invalid SRTP policy: {why}"),
            UnsupportedAuth(name) => write!(f, "authentication {name} is not supported"),
            MasterKeyLength { expected, got } => {
                write!(f, "master key must be {expected} bytes, got {got}")
            }
            MasterSaltLength { expected, got } => {
                write!(f, "master salt must be {expected} bytes, got {got}")
            }
            KeyLengthMismatch {
                label,
                expected,
                got,
            } => write!(
                f,
                "session key for label {label} must be {expected} bytes, got {got}"
            ),
            Cipher(e) => write!(f, "cipher error: {e}"),
            Closed => write!(f, "context factory is closed"),
            MutexPoisoned => write!(f, "mutex poisoned"),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::Cipher(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CipherError> for ContextError {
    fn from(e: CipherError) -> Self {
        ContextError::Cipher(e)
    }
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for ContextError {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        ContextError::MutexPoisoned
    }
}
