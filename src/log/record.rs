use std::fmt::Write as _;
use std::time::SystemTime;

use crate::log::{log_level::LogLevel, log_value::LogValue};

/// Milliseconds since the UNIX epoch, or 0 if the clock is before it.
#[must_use]
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// One unit of work flowing through the forwarder.
///
/// A record is built once by the producer at submit time and never mutated
/// afterwards: it either reaches the sink or is handed to the overflow
/// handler, exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    level: LogLevel,
    message: String,
    args: Vec<LogValue>,
    target: &'static str,
    ts_ms: u128,
}

impl Record {
    /// Creates a new `Record` stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `level` - The severity of the record.
    /// * `message` - The message text. Accepts any type that implements `Into<String>`.
    /// * `args` - Positional arguments, carried through untouched.
    /// * `target` - A static string naming the origin (usually `module_path!()`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use rustylog::log::{LogLevel, Record};
    ///
    /// let rec = Record::new(LogLevel::Info, "hello", vec!["test".into(), 0.into()], module_path!());
    /// assert_eq!(rec.message(), "hello");
    /// ```
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        args: Vec<LogValue>,
        target: &'static str,
    ) -> Self {
        Self::with_timestamp(level, message, args, target, now_millis())
    }

    /// Same as [`Record::new`] with an explicit millisecond timestamp.
    pub fn with_timestamp(
        level: LogLevel,
        message: impl Into<String>,
        args: Vec<LogValue>,
        target: &'static str,
        ts_ms: u128,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            args,
            target,
            ts_ms,
        }
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn args(&self) -> &[LogValue] {
        &self.args
    }

    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }

    #[must_use]
    pub fn ts_ms(&self) -> u128 {
        self.ts_ms
    }

    /// Renders the message followed by its args as `key=value` pairs.
    ///
    /// Args alternate key, value. A trailing value without a key is written as
    /// `EXTRA_VALUE_AT_END=value`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.message.clone();
        for pair in self.args.chunks(2) {
            match pair {
                [k, v] => {
                    let _ = write!(out, " {k}={v}");
                }
                [v] => {
                    let _ = write!(out, " EXTRA_VALUE_AT_END={v}");
                }
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stamps_time_and_keeps_fields() {
        let rec = Record::new(LogLevel::Warn, "disk low", vec![], "test::target");
        assert_eq!(rec.level(), LogLevel::Warn);
        assert_eq!(rec.message(), "disk low");
        assert_eq!(rec.target(), "test::target");
        assert!(rec.ts_ms() > 0, "timestamp should be non-zero");
    }

    #[test]
    fn render_pairs_args() {
        let rec = Record::with_timestamp(
            LogLevel::Info,
            "hello",
            vec!["test".into(), 0.into(), "peer".into(), "10.0.0.1".into()],
            "t",
            1,
        );
        assert_eq!(rec.render(), "hello test=0 peer=10.0.0.1");
    }

    #[test]
    fn render_marks_unpaired_trailing_value() {
        let rec = Record::with_timestamp(
            LogLevel::Info,
            "odd",
            vec!["k".into(), 1.into(), "orphan".into()],
            "t",
            1,
        );
        assert_eq!(rec.render(), "odd k=1 EXTRA_VALUE_AT_END=orphan");
    }

    #[test]
    fn render_without_args_is_message() {
        let rec = Record::with_timestamp(LogLevel::Info, "plain", vec![], "t", 1);
        assert_eq!(rec.render(), "plain");
    }
}
