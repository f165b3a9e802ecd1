//! # pvsadm SDK
//!
//! Typed clients for the IBM Cloud services pvsadm talks to:
//! - IAM token service ([`auth`])
//! - Resource Controller v2 ([`resource_controller`])
//! - Cloud Object Storage S3 endpoints ([`cos`])
//! - PowerVS cloud-instance images ([`power`])
//!
//! On top of those sit the image import workflow ([`import`]) and the
//! purge candidate filter ([`power::PurgeFilter`]).

pub mod auth;
pub mod client;
pub mod cos;
pub mod endpoints;
pub mod error;
pub mod import;
pub mod power;
pub mod resource_controller;
pub mod types;

pub use client::{ClientBuilder, IbmCloudClient};
pub use endpoints::Endpoints;
pub use error::{ApiError, Result};
pub use import::{ImageImporter, ImportImageOptions};
pub use power::{ImageClient, InstanceSelector, PurgeFilter};
pub use types::*;
