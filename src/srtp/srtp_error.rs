use std::fmt;

/// Why a single packet was dropped. The context is left as it was before the
/// call, so the stream carries on with the next packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrtpError {
    /// Too short to hold the header and trailer the policy mandates.
    InvalidPacket,
    /// Authentication tag mismatch.
    AuthFail,
    /// Index is further behind the newest accepted one than the window reaches.
    ReplayOld,
    /// Index is inside the window and was already accepted.
    ReplayFail,
}

/// Per-packet status: `Ok(())` is the OK status.
pub type SrtpResult = Result<(), SrtpError>;

impl fmt::Display for SrtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SrtpError::*;
        match self {
            InvalidPacket => write!(f, "invalid SRTP packet"),
            AuthFail => write!(f, "SRTP authentication failed"),
            ReplayOld => write!(f, "SRTP packet outside the replay window"),
            ReplayFail => write!(f, "SRTP packet replayed"),
        }
    }
}

impl std::error::Error for SrtpError {}
