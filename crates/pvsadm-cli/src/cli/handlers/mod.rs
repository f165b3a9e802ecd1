//! Command handlers for pvsadm

pub mod image;
pub mod purge;
