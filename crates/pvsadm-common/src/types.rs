//! Validated PowerVS image parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an image parameter is not one of the accepted values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("Provide valid OsType.. allowable values are [aix, ibmi, redhat, sles]")]
    OsType(String),
    #[error("Provide valid StorageType.. allowable values are [tier1, tier3]")]
    StorageType(String),
}

/// Operating system of an imported image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Aix,
    Ibmi,
    #[default]
    Redhat,
    Sles,
}

impl OsType {
    pub const ALL: [OsType; 4] = [OsType::Aix, OsType::Ibmi, OsType::Redhat, OsType::Sles];

    /// Lower-case form sent to the PowerVS API
    pub fn as_str(&self) -> &'static str {
        match self {
            OsType::Aix => "aix",
            OsType::Ibmi => "ibmi",
            OsType::Redhat => "redhat",
            OsType::Sles => "sles",
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|os| os.as_str() == lowered)
            .ok_or_else(|| TypeParseError::OsType(s.to_string()))
    }
}

/// Disk tier used for the image volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Tier1,
    #[default]
    Tier3,
}

impl StorageType {
    pub const ALL: [StorageType; 2] = [StorageType::Tier1, StorageType::Tier3];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Tier1 => "tier1",
            StorageType::Tier3 => "tier3",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == lowered)
            .ok_or_else(|| TypeParseError::StorageType(s.to_string()))
    }
}
