use std::fmt;

use crate::srtp::context_error::ContextError;
use crate::srtp::srtp_error::SrtpError;

/// What a transformer can report: either the packet was rejected, or no
/// context could be produced for its SSRC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    Packet(SrtpError),
    Context(ContextError),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Packet(e) => write!(f, "{e}"),
            TransformError::Context(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Packet(e) => Some(e),
            TransformError::Context(e) => Some(e),
        }
    }
}

impl From<SrtpError> for TransformError {
    fn from(e: SrtpError) -> Self {
        TransformError::Packet(e)
    }
}

impl From<ContextError> for TransformError {
    fn from(e: ContextError) -> Self {
        TransformError::Context(e)
    }
}
