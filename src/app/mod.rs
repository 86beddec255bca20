//! Command line harness around the queue library

pub mod args;
pub mod display;
pub mod startup;
