//! Bounded, instrumented message queues for wiring pipeline stages together

pub mod core;
pub mod queue;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
