//! Test modules for the queue system
//!
//! Tests are organised by functional area.

mod concurrent;
mod rates;
