use crate::srtp::constants::REPLAY_WINDOW_SIZE;
use crate::srtp::srtp_error::{SrtpError, SrtpResult};

/// 64-entry sliding bitmask. Bit `i` is set when the index `i` positions
/// behind the newest accepted one has been accepted. The newest index itself
/// is tracked by the owning context; this type only sees signed deltas from
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReplayWindow {
    bits: u64,
}

impl ReplayWindow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg_attr(not(feature = "log-debug"), allow(dead_code))]
    pub(crate) fn bits(&self) -> u64 {
        self.bits
    }

    /// Classifies an index `delta` positions ahead of (positive) or behind
    /// (negative) the newest accepted one.
    pub(crate) fn check(&self, delta: i64) -> SrtpResult {
        if delta > 0 {
            return Ok(());
        }
        let behind = delta.unsigned_abs();
        if behind >= REPLAY_WINDOW_SIZE {
            Err(SrtpError::ReplayOld)
        } else if (self.bits >> behind) & 1 != 0 {
            Err(SrtpError::ReplayFail)
        } else {
            Ok(())
        }
    }

    /// Records an accepted index. A positive `delta` slides the window.
    pub(crate) fn update(&mut self, delta: i64) {
        if delta >= REPLAY_WINDOW_SIZE as i64 {
            self.bits = 1;
        } else if delta > 0 {
            self.bits = (self.bits << delta) | 1;
        } else {
            let behind = delta.unsigned_abs();
            if behind < REPLAY_WINDOW_SIZE {
                self.bits |= 1 << behind;
            }
        }
    }
}
