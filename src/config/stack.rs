// Copyright (c) 2025 - Cowboy AI, Inc.

//! Stack-level settings that do not come from the zone document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{DomainName, Region};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{Expr, Pseudo};

/// Price class applied to every distribution
pub const DEFAULT_PRICE_CLASS: &str = "PriceClass_100";

/// Minimum viewer TLS protocol when a certificate is bound
pub const DEFAULT_MINIMUM_PROTOCOL_VERSION: &str = "TLSv1.2_2021";

/// Settings for one synthesized stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Stack name, also used in the template description
    pub stack_name: String,

    /// Region this stack is deployed to
    pub region: Region,

    /// Account id, if pinned
    pub account: Option<String>,

    /// Region the shared certificate lives in
    pub certificate_region: Region,

    /// Distribution price class
    pub price_class: String,

    /// Minimum TLS protocol for certificate-bound distributions
    pub minimum_protocol_version: String,

    /// Zones whose hosted zone already exists (zone → hosted zone id)
    #[serde(default)]
    pub existing_hosted_zones: BTreeMap<DomainName, String>,
}

impl StackConfig {
    /// Create a configuration for a stack in `region`
    pub fn new(stack_name: impl Into<String>, region: Region) -> Self {
        Self {
            stack_name: stack_name.into(),
            region,
            ..Self::default()
        }
    }

    /// Pin the account id
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Override the certificate region
    pub fn with_certificate_region(mut self, region: Region) -> Self {
        self.certificate_region = region;
        self
    }

    /// Override the price class
    pub fn with_price_class(mut self, price_class: impl Into<String>) -> Self {
        self.price_class = price_class.into();
        self
    }

    /// Reuse an existing hosted zone instead of creating one
    pub fn with_existing_hosted_zone(mut self, zone: DomainName, hosted_zone_id: impl Into<String>) -> Self {
        self.existing_hosted_zones.insert(zone, hosted_zone_id.into());
        self
    }

    /// Whether the shared certificate is issued by this stack
    pub fn issues_certificate(&self) -> bool {
        self.region == self.certificate_region
    }

    /// Account id as a template value; the deploying account unless pinned
    pub fn account_id(&self) -> Expr {
        match &self.account {
            Some(account) => Expr::literal(account.as_str()),
            None => Expr::Pseudo(Pseudo::AccountId),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `STACK_NAME` (default `us-infra-stack`)
    /// - `STACK_REGION` (default `us-east-1`)
    /// - `AWS_ACCOUNT_ID` (optional)
    /// - `CERTIFICATE_REGION` (default `us-east-1`)
    /// - `PRICE_CLASS` (default `PriceClass_100`)
    pub fn from_env() -> TopologyResult<Self> {
        let region_var = |name: &str| -> TopologyResult<Option<Region>> {
            match std::env::var(name) {
                Ok(value) if !value.is_empty() => Region::new(value)
                    .map(Some)
                    .map_err(|e| TopologyError::shape(name, e)),
                _ => Ok(None),
            }
        };

        let mut config = Self::default();
        if let Ok(name) = std::env::var("STACK_NAME") {
            config.stack_name = name;
        }
        if let Some(region) = region_var("STACK_REGION")? {
            config.region = region;
        }
        if let Some(region) = region_var("CERTIFICATE_REGION")? {
            config.certificate_region = region;
        }
        config.account = std::env::var("AWS_ACCOUNT_ID").ok().filter(|a| !a.is_empty());
        if let Ok(price_class) = std::env::var("PRICE_CLASS") {
            config.price_class = price_class;
        }

        Ok(config)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_name: "us-infra-stack".to_string(),
            region: Region::cdn_certificate_region(),
            account: None,
            certificate_region: Region::cdn_certificate_region(),
            price_class: DEFAULT_PRICE_CLASS.to_string(),
            minimum_protocol_version: DEFAULT_MINIMUM_PROTOCOL_VERSION.to_string(),
            existing_hosted_zones: BTreeMap::new(),
        }
    }
}
