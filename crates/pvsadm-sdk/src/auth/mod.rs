//! Authentication module for the pvsadm SDK
//!
//! IBM Cloud services accept IAM bearer tokens obtained by exchanging an
//! API key at the IAM token endpoint. The [`TokenManager`] performs that
//! exchange and caches the token until it is about to expire.

pub mod manager;
pub mod types;

pub use manager::TokenManager;
pub use types::{AuthError, AuthResult, TokenSet};
