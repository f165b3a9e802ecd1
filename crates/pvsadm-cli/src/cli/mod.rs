//! Command-line parsing and dispatch

pub mod args;
pub mod commands;
pub mod handlers;

pub use args::Args;
pub use commands::*;
