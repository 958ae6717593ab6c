// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provider region value object

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Region validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid region identifier: '{0}'")]
pub struct RegionError(pub String);

/// Provider region such as `us-east-1` or `eu-west-2`
///
/// Shape: lowercase segments separated by hyphens, ending in a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Region where CDN viewer certificates must live
    pub const CDN_CERTIFICATE_REGION: &'static str = "us-east-1";

    /// Create a region with validation
    pub fn new(region: impl Into<String>) -> Result<Self, RegionError> {
        let region = region.into();
        let segments: Vec<&str> = region.split('-').collect();

        let well_formed = segments.len() >= 3
            && segments
                .iter()
                .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
            && segments
                .last()
                .map(|s| s.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false);

        if !well_formed {
            return Err(RegionError(region));
        }
        Ok(Self(region))
    }

    /// The region CDN certificates are issued in
    pub fn cdn_certificate_region() -> Self {
        Self(Self::CDN_CERTIFICATE_REGION.to_string())
    }

    /// Get the region as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Region {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.0
    }
}
