pub mod log_level;
pub mod log_macros;
pub mod log_sink;
pub mod log_value;
pub mod noop_log_sink;
pub mod record;
pub mod record_sink;
pub mod writer_sink;

pub use log_level::LogLevel;
pub use log_sink::LogSink;
pub use log_value::LogValue;
pub use noop_log_sink::NoopLogSink;
pub use record::Record;
pub use record_sink::{LogSinkAdapter, RecordSink};
pub use writer_sink::{FileSink, WriterSink};
