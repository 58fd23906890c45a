use std::{
    sync::mpsc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink};

/// Lightweight, cloneable sink that forwards log events over a bounded channel.
///
/// Calls to [`try_log`](Self::try_log) never block: if the queue is full the
/// message is dropped and an error is returned. Packet-processing threads can
/// therefore log without ever stalling on a slow consumer.
///
/// # Examples
/// ```ignore
/// let (handle, rx) = LoggerHandle::channel(1024);
/// let sink: Arc<dyn LogSink> = Arc::new(handle);
/// // drain `rx` on a background thread
/// ```
#[derive(Clone)]
pub struct LoggerHandle {
    pub(super) tx: mpsc::SyncSender<LogMsg>,
}

impl LogSink for LoggerHandle {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let _ = self.try_log(level, msg, target);
    }
}

impl LoggerHandle {
    /// Creates a handle plus the receiving end of its queue.
    #[must_use]
    pub fn channel(cap: usize) -> (Self, mpsc::Receiver<LogMsg>) {
        let (tx, rx) = mpsc::sync_channel(cap);
        (Self { tx }, rx)
    }

    /// Attempts to enqueue a log message without blocking.
    ///
    /// # Errors
    /// Returns:
    /// - `Err(TrySendError::Full(_))` when the bounded queue is at capacity (message is not sent).
    /// - `Err(TrySendError::Disconnected(_))` when the receiver has been dropped.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogMsg>> {
        let msg = LogMsg::new(level, text, target, now_millis());
        self.tx.try_send(msg)
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
