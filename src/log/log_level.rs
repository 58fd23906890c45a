/// Severity of a log message, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Per-packet detail (protect/unprotect of single packets).
    Trace,
    /// Context lifecycle and replay-window dumps.
    Debug,
    /// Backend selection and other one-off events.
    Info,
    /// Packets dropped for authentication failures.
    Warn,
    /// Internal inconsistencies, such as a sender failing its own replay check.
    Error,
}

impl LogLevel {
    /// Parses a level name as written in the `[Srtp]` config section.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}
