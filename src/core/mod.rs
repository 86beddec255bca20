//! Core services shared by the queue library and the binary

pub mod config;
pub mod logging;
pub mod sync;
pub mod time;
