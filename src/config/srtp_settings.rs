use crate::config::Config;
use crate::crypto::CipherBackend;
use crate::log::{LevelFilterSink, LogLevel, LogSink};
use crate::srtp::SrtpPolicy;

const SECTION: &str = "Srtp";

/// How the process-wide cipher backend is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendPreference {
    /// Probe, optionally benchmark, and pick.
    Auto,
    Fixed(CipherBackend),
}

/// Typed view of the `[Srtp]` section.
///
/// ```text
/// [Srtp]
/// # auto | rustcrypto | openssl
/// cipher_backend = auto
/// benchmark = false
/// send_replay_protection = true
/// receive_replay_protection = true
/// log_level = info
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtpSettings {
    pub cipher_backend: BackendPreference,
    pub benchmark: bool,
    pub send_replay_protection: bool,
    pub receive_replay_protection: bool,
    pub log_level: LogLevel,
}

impl Default for SrtpSettings {
    fn default() -> Self {
        Self {
            cipher_backend: BackendPreference::Auto,
            benchmark: false,
            send_replay_protection: true,
            receive_replay_protection: true,
            log_level: LogLevel::Info,
        }
    }
}

impl SrtpSettings {
    /// Reads the `[Srtp]` section; missing keys keep their defaults. The log
    /// level falls back to a global `log_level` key.
    ///
    /// # Errors
    /// Returns a message for unknown backend or level names and for values
    /// that are not booleans.
    pub fn from_config(cfg: &Config) -> Result<Self, String> {
        let defaults = Self::default();

        let cipher_backend = match cfg.get_or_default(SECTION, "cipher_backend", "auto") {
            b if b.eq_ignore_ascii_case("auto") => BackendPreference::Auto,
            other => BackendPreference::Fixed(CipherBackend::from_name(other).ok_or_else(|| {
                format!("[{SECTION}] cipher_backend: unknown backend {other:?}")
            })?),
        };

        let level_name = cfg.get_or_default(SECTION, "log_level", "info");
        let log_level = LogLevel::from_name(level_name)
            .ok_or_else(|| format!("[{SECTION}] log_level: unknown level {level_name:?}"))?;

        Ok(Self {
            cipher_backend,
            benchmark: cfg.get_bool(SECTION, "benchmark", defaults.benchmark)?,
            send_replay_protection: cfg.get_bool(
                SECTION,
                "send_replay_protection",
                defaults.send_replay_protection,
            )?,
            receive_replay_protection: cfg.get_bool(
                SECTION,
                "receive_replay_protection",
                defaults.receive_replay_protection,
            )?,
            log_level,
        })
    }

    /// Copies the replay-protection switches onto a policy.
    pub fn apply_to(&self, policy: &mut SrtpPolicy) {
        policy.set_send_replay_enabled(self.send_replay_protection);
        policy.set_receive_replay_enabled(self.receive_replay_protection);
    }

    /// Wraps `sink` so it only sees messages at `log_level` or above.
    pub fn filtered_sink<S: LogSink>(&self, sink: S) -> LevelFilterSink<S> {
        LevelFilterSink::new(sink, self.log_level)
    }
}
