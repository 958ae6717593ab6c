// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone specifications and certificate requirements
//!
//! A [`ZoneSpec`] is one entry of the zone list and drives exactly one
//! certificate → distribution → DNS sub-pipeline. A
//! [`CertificateRequirement`] describes the single certificate shared by all
//! zones.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{AliasLabel, DomainName, DomainNameError};

/// One public zone: apex domain, origin bucket, alias subdomains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Apex of the zone
    pub zone_name: DomainName,

    /// Name of the storage bucket that serves the content
    pub bucket_name: String,

    /// Subdomains relative to `zone_name`, in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias_labels: Vec<AliasLabel>,
}

impl ZoneSpec {
    /// Create a zone without aliases
    pub fn new(zone_name: DomainName, bucket_name: impl Into<String>) -> Self {
        Self {
            zone_name,
            bucket_name: bucket_name.into(),
            alias_labels: Vec::new(),
        }
    }

    /// Add alias labels (duplicates are ignored)
    pub fn with_aliases(mut self, labels: impl IntoIterator<Item = AliasLabel>) -> Self {
        for label in labels {
            if !self.alias_labels.contains(&label) {
                self.alias_labels.push(label);
            }
        }
        self
    }

    /// Fully-qualified alias names, one per label
    ///
    /// Each name is built from its own label (`www` → `www.example.com`)
    /// and fails if the joined name is not a valid domain.
    pub fn alias_domains(&self) -> Result<Vec<DomainName>, DomainNameError> {
        self.alias_labels
            .iter()
            .map(|label| self.zone_name.with_alias(label))
            .collect()
    }

    /// Names the distribution answers for: every alias, then the apex
    pub fn distribution_aliases(&self) -> Result<Vec<DomainName>, DomainNameError> {
        let mut names = self.alias_domains()?;
        names.push(self.zone_name.clone());
        Ok(names)
    }

    /// Whether the zone declares alias subdomains
    pub fn has_aliases(&self) -> bool {
        !self.alias_labels.is_empty()
    }
}

/// Name listed on a certificate, optionally a single-level wildcard
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CertificateName {
    wildcard: bool,
    base: DomainName,
}

impl CertificateName {
    /// Parse `example.com` or `*.example.com`
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainNameError> {
        let name = name.as_ref().trim();
        match name.strip_prefix("*.") {
            Some(base) => Ok(Self {
                wildcard: true,
                base: DomainName::new(base)?,
            }),
            None => Ok(Self {
                wildcard: false,
                base: DomainName::new(name)?,
            }),
        }
    }

    /// Whether this certificate name matches `domain`
    ///
    /// A wildcard matches exactly one extra label, never the base itself.
    pub fn covers(&self, domain: &DomainName) -> bool {
        if self.wildcard {
            domain.parent().as_ref() == Some(&self.base)
        } else {
            domain == &self.base
        }
    }

    /// Domain this name validates against (`*.example.com` → `example.com`)
    pub fn validation_domain(&self) -> &DomainName {
        &self.base
    }

    /// Whether this is a wildcard name
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}

impl From<DomainName> for CertificateName {
    fn from(base: DomainName) -> Self {
        Self {
            wildcard: false,
            base,
        }
    }
}

impl fmt::Display for CertificateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "*.{}", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

impl TryFrom<String> for CertificateName {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CertificateName> for String {
    fn from(value: CertificateName) -> Self {
        value.to_string()
    }
}

/// The shared certificate every zone's distribution binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequirement {
    /// Primary certificate name
    pub domain_name: CertificateName,

    /// Additional names on the certificate
    #[serde(default)]
    pub subject_alternative_names: BTreeSet<CertificateName>,

    /// Domain → hosted zone id used for DNS validation
    #[serde(default)]
    pub validation_zones: BTreeMap<DomainName, String>,

    /// Parameter the issued ARN is published to and looked up from
    pub parameter_name: String,
}

impl CertificateRequirement {
    /// All names the certificate covers, primary first
    pub fn covered_names(&self) -> Vec<CertificateName> {
        let mut names = vec![self.domain_name.clone()];
        names.extend(
            self.subject_alternative_names
                .iter()
                .filter(|name| **name != self.domain_name)
                .cloned(),
        );
        names
    }

    /// Whether any certificate name matches `domain`
    pub fn covers(&self, domain: &DomainName) -> bool {
        self.covered_names().iter().any(|name| name.covers(domain))
    }

    /// Hosted zone validating `name`: exact match first, then nearest parent
    pub fn validation_zone_for(&self, name: &CertificateName) -> Option<&str> {
        let mut candidate = Some(name.validation_domain().clone());
        while let Some(domain) = candidate {
            if let Some(zone_id) = self.validation_zones.get(&domain) {
                return Some(zone_id.as_str());
            }
            candidate = domain.parent();
        }
        None
    }
}
