//! Shared tracing setup for the dashboard binaries.

mod subscriber;

pub use subscriber::{LogSink, init};
