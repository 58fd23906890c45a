//! INI-style configuration: `key = value` pairs, optionally grouped under
//! `[Section]` headers. Lines starting with `#` or `;` are comments and
//! values may be wrapped in double quotes.

mod srtp_settings;

pub use srtp_settings::{BackendPreference, SrtpSettings};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// Reads and parses a config file.
    ///
    /// # Errors
    /// Returns a message naming the path if the file cannot be read, or the
    /// offending line if it cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Error reading file {}: {e}", path.display()))?;
        Self::parse(&content)
    }

    /// Parses config text already held in memory.
    ///
    /// # Errors
    /// Returns `line N: ...` for an unterminated `[Section` header, an empty
    /// section name, or a non-comment line without `=`.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut cfg = Self::empty();
        let mut current_section: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| format!("line {line_no}: unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(format!("line {line_no}: empty section name"));
                }
                current_section = Some(name.to_string());
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {line_no}: expected key = value, got {line:?}"))?;
            let key = key.trim().to_string();
            let value = value.trim().trim_matches('"').to_string();

            match &current_section {
                None => {
                    cfg.globals.insert(key, value);
                }
                Some(sec) => {
                    cfg.sections.entry(sec.clone()).or_default().insert(key, value);
                }
            }
        }
        Ok(cfg)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    /// Section value, then global value, then `default`. Empty strings count
    /// as unset.
    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .filter(|s| !s.is_empty())
            .or_else(|| self.get_global(key).filter(|s| !s.is_empty()))
            .unwrap_or(default)
    }

    /// Boolean lookup accepting `true/false`, `yes/no`, `on/off` and `1/0`.
    ///
    /// # Errors
    /// Returns a message naming the key when the value is none of those.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, String> {
        let Some(raw) = self.get(section, key).filter(|s| !s.is_empty()) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            other => Err(format!("[{section}] {key}: expected a boolean, got {other:?}")),
        }
    }
}
