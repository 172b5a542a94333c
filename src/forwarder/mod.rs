pub mod bounded_queue;
pub mod cancellation;
pub mod consumer_loop;
pub mod forwarder;
pub mod forwarder_handle;
pub mod overflow;


pub use bounded_queue::BoundedQueue;
pub use cancellation::CancellationSignal;
pub use consumer_loop::{ConsumerState, SeverityPolicy};
pub use forwarder::Forwarder;
pub use forwarder_handle::ForwarderHandle;
pub use overflow::{DropCounter, OverflowHandler};
