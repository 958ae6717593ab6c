// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Name Value Objects with DNS Validation Invariants
//!
//! [`DomainName`] is a fully-qualified zone or record name, [`AliasLabel`] is
//! a name relative to a zone (`www` in `www.example.com`).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Domain name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("Domain name is empty")]
    Empty,

    #[error("Domain name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Invalid character in domain name: {0}")]
    InvalidCharacter(char),

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Top-level label cannot be all numeric: {0}")]
    NumericTld(String),

    #[error("Domain name is not fully qualified: {0}")]
    NotFullyQualified(String),
}

const MAX_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

fn validate_label(label: &str) -> Result<(), DomainNameError> {
    if label.is_empty() {
        return Err(DomainNameError::Empty);
    }

    if label.len() > MAX_LABEL_LENGTH {
        return Err(DomainNameError::LabelTooLong(label.to_string()));
    }

    for ch in label.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' {
            return Err(DomainNameError::InvalidCharacter(ch));
        }
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(DomainNameError::InvalidLabelFormat(label.to_string()));
    }

    Ok(())
}

fn canonicalize(raw: &str) -> Result<String, DomainNameError> {
    let name = raw.trim().trim_end_matches('.').to_ascii_lowercase();

    if name.is_empty() {
        return Err(DomainNameError::Empty);
    }

    if name.len() > MAX_LENGTH {
        return Err(DomainNameError::TooLong(name.len()));
    }

    for label in name.split('.') {
        validate_label(label)?;
    }

    Ok(name)
}

/// Fully Qualified Domain Name used for zones and record names
///
/// # Invariants
/// - At least two labels (`example.com`, never `localhost`)
/// - Total length ≤ 253, each label ≤ 63 (RFC 1123)
/// - Labels are alphanumeric or hyphen, never hyphen-delimited
/// - The top-level label is not all numeric
/// - Stored lowercase without a trailing dot
///
/// # Examples
///
/// ```rust
/// use zone_topology::domain::DomainName;
///
/// let zone = DomainName::new("Example.COM.").unwrap();
/// assert_eq!(zone.as_str(), "example.com");
///
/// assert!(DomainName::new("localhost").is_err());
/// assert!(DomainName::new("-bad.example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Create a new domain name with validation
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainNameError> {
        let name = canonicalize(name.as_ref())?;

        let mut labels = name.rsplit('.');
        let tld = labels.next().unwrap_or_default();
        if labels.next().is_none() {
            return Err(DomainNameError::NotFullyQualified(name));
        }
        if tld.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainNameError::NumericTld(tld.to_string()));
        }

        Ok(Self(name))
    }

    /// Get the domain name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get labels from left to right
    pub fn labels(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// Prefix this name with a relative alias (`www` + `example.com`)
    ///
    /// The result is validated again, since a valid label on a valid zone
    /// can still exceed the total length limit.
    pub fn with_alias(&self, alias: &AliasLabel) -> Result<DomainName, DomainNameError> {
        DomainName::new(format!("{}.{}", alias.as_str(), self.0))
    }

    /// Parent domain (everything after the first label), if still qualified
    pub fn parent(&self) -> Option<DomainName> {
        self.0
            .split_once('.')
            .and_then(|(_, rest)| DomainName::new(rest).ok())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

/// Subdomain name relative to a zone
///
/// Usually a single label such as `www`; dotted relative names (`static.eu`)
/// are accepted as long as every label is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AliasLabel(String);

impl AliasLabel {
    /// Create a new alias label with validation
    pub fn new(label: impl AsRef<str>) -> Result<Self, DomainNameError> {
        canonicalize(label.as_ref()).map(Self)
    }

    /// Get the label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AliasLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AliasLabel {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AliasLabel> for String {
    fn from(value: AliasLabel) -> Self {
        value.0
    }
}
