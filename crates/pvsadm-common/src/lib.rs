//! # pvsadm-common
//!
//! Shared building blocks for the pvsadm crates:
//! - validated PowerVS image parameters (OS type, storage type)
//! - duration parsing and the purge window predicate
//! - configuration errors
//! - unified logging initialization

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use error::ConfigurationError;
pub use types::{OsType, StorageType, TypeParseError};
