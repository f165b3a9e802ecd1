//! Utility functions shared across pvsadm components

pub mod duration;
pub mod purge;

pub use duration::parse_duration;
pub use purge::is_purgeable;
