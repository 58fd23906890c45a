use crate::log::log_level::LogLevel;

/// A single log event as queued by [`LoggerHandle`](crate::log::LoggerHandle).
#[derive(Debug, Clone)]
pub struct LogMsg {
    /// The severity level of the log (e.g. Info, Warn, Error).
    pub level: LogLevel,
    /// Wall-clock timestamp of the event in milliseconds since the UNIX epoch.
    pub ts_ms: u128,
    /// The formatted message.
    pub text: String,
    /// The static module path the event came from.
    pub target: &'static str,
}

impl LogMsg {
    /// Creates a new `LogMsg` stamped with the given time.
    ///
    /// ```rust,ignore
    /// let msg = LogMsg::new(LogLevel::Warn, "SRTP auth failed", module_path!(), 1678900000000);
    /// ```
    pub fn new(
        level: LogLevel,
        text: impl Into<String>,
        target: &'static str,
        ts_ms: u128,
    ) -> Self {
        Self {
            level,
            ts_ms,
            text: text.into(),
            target,
        }
    }
}
