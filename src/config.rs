use std::collections::HashMap;
use std::fmt;
use std::fs;

use crate::{forwarder::SeverityPolicy, log::LogLevel};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Read(String),
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConfigError::*;
        match self {
            Read(e) => write!(f, "Config read error: {e}"),
            InvalidValue {
                section,
                key,
                value,
            } => write!(f, "Invalid value for [{section}] {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// INI-style settings: `[section]` headers, `key = value` lines, `#` comments.
/// Keys before the first header are globals.
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{path}: {e}")))?;
        Ok(Self::parse(&content))
    }

    /// Parses config text. Lines that are neither headers nor `key = value` are ignored.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        cfg.globals.insert(key, value);
                    }
                    Some(sec) => {
                        cfg.sections
                            .entry(sec.clone())
                            .or_default()
                            .insert(key, value);
                    }
                }
            }
        }
        cfg
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    /// Section value, else global value, else `default`.
    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }
}

/// Settings for [`Forwarder::start`](crate::forwarder::Forwarder::start).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    /// Queue capacity. 0 drops every record.
    pub capacity: usize,
    /// Which drained records reach the sink.
    pub severity: SeverityPolicy,
    /// Name of the consumer thread.
    pub thread_name: String,
}

impl ForwarderConfig {
    pub const SECTION: &'static str = "Forwarder";
    pub const DEFAULT_CAPACITY: usize = 100;
    pub const DEFAULT_THREAD_NAME: &'static str = "log-forwarder";

    /// Reads the `[Forwarder]` section; missing keys keep their defaults.
    ///
    /// Keys: `capacity` (non-negative integer), `forward_levels` (`all` or a
    /// level name), `thread_name`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a capacity or level that does not parse.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut out = Self::default();

        if let Some(raw) = config.get_non_empty(Self::SECTION, "capacity") {
            out.capacity = raw
                .parse()
                .map_err(|_| invalid("capacity", raw))?;
        }

        if let Some(raw) = config.get_non_empty(Self::SECTION, "forward_levels") {
            out.severity = if raw.eq_ignore_ascii_case("all") {
                SeverityPolicy::All
            } else {
                LogLevel::parse(raw)
                    .map(SeverityPolicy::Only)
                    .ok_or_else(|| invalid("forward_levels", raw))?
            };
        }

        if let Some(name) = config.get_non_empty(Self::SECTION, "thread_name") {
            out.thread_name = name.to_owned();
        }

        Ok(out)
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            severity: SeverityPolicy::default(),
            thread_name: Self::DEFAULT_THREAD_NAME.to_owned(),
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: ForwarderConfig::SECTION.to_owned(),
        key: key.to_owned(),
        value: value.to_owned(),
    }
}
