//! rustylog is a bounded, non-blocking record forwarder.
//!
//! Many producer threads submit log records; a single background consumer
//! drains them, oldest first, into a possibly slow sink. Producers never wait
//! on the sink: when the fixed-size queue is full the new record is handed to
//! an overflow handler on the producer's thread and dropped.
//!
//! The crate is structured into three modules:
//! - [`log`]: records, levels, sinks and the leveled logging macros.
//! - [`forwarder`]: the bounded queue, cancellation signal, consumer loop and
//!   the producer-facing [`Forwarder`](forwarder::Forwarder).
//! - [`config`]: INI-style configuration and [`ForwarderConfig`](config::ForwarderConfig).

/// Handles configuration loading and forwarder settings.
pub mod config;
/// Bounded queue, consumer loop and producer-facing forwarder.
pub mod forwarder;
/// Records, levels, sinks and logging macros.
pub mod log;
