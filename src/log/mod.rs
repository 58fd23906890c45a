pub mod log_level;
pub mod log_macros;
pub mod log_msg;
pub mod log_sink;
pub mod logger_handle;
pub use log_level::LogLevel;
pub use log_sink::{LevelFilterSink, LogSink, NoopLogSink};
pub use logger_handle::LoggerHandle;
