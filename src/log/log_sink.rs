use crate::log::log_level::LogLevel;

/// Thread-safe destination for the crate's own diagnostic lines.
///
/// This is what the `sink_*!` macros write to. A [`ForwarderHandle`](crate::forwarder::ForwarderHandle)
/// implements it too, so those macros can feed a forwarder directly.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str);
}
