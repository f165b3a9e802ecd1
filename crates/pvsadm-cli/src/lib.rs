//! # pvsadm CLI
//!
//! Command-line interface for IBM Cloud PowerVS image administration:
//! - `image import` / `image ls`
//! - `purge images`
//!
//! Argument parsing uses clap derive macros, each subcommand is served by
//! a handler, and all remote calls go through `pvsadm-sdk`.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod interactive;
pub mod output;
pub mod progress;

pub use cli::*;
pub use error::*;
