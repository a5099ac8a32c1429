//! Remote shipping of error and fatal lines

pub mod batcher;
pub mod transport;

pub use batcher::{BatcherConfig, RemoteBatcher};
pub use transport::{HttpTransport, Transport};
