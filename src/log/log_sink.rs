use crate::log::log_level::LogLevel;

/// Destination for log lines emitted by the `sink_*!` macros.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str);
}

/// Discards every message. Useful for tests and for callers that do not
/// collect SRTP diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn log(&self, _level: LogLevel, _msg: &str, _target: &'static str) {}
}

/// Forwards only messages at or above `min_level` to the wrapped sink.
pub struct LevelFilterSink<S: LogSink> {
    inner: S,
    min_level: LogLevel,
}

impl<S: LogSink> LevelFilterSink<S> {
    pub fn new(inner: S, min_level: LogLevel) -> Self {
        Self { inner, min_level }
    }
}

impl<S: LogSink> LogSink for LevelFilterSink<S> {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        if level >= self.min_level {
            self.inner.log(level, msg, target);
        }
    }
}
