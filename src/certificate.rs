// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared TLS Certificate
//!
//! One certificate serves every zone. A stack deployed to the certificate
//! region issues it (DNS validated across the validation zones) and
//! publishes its ARN to a well-known parameter; a stack anywhere else looks
//! that ARN up through the cross-region resolver.

use serde_json::{json, Value};
use tracing::info;

use crate::config::StackConfig;
use crate::domain::{CertificateName, CertificateRequirement, DomainName, Region};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{Expr, LogicalId, Resource, ResourceGraph};
use crate::parameter::{CrossRegionParameter, CrossRegionParameterResolver};

pub const CERTIFICATE_TYPE: &str = "AWS::CertificateManager::Certificate";
pub const PARAMETER_TYPE: &str = "AWS::SSM::Parameter";
pub const PARAMETER_DESCRIPTION: &str = "Cloud Web App Certificate ARN.";

const CERTIFICATE_ID: &str = "AppCertificate";
const CERTIFICATE_PARAMETER_ID: &str = "AppCertificateArnParameter";

/// Where the certificate comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSource {
    /// Declare and validate a new certificate in this stack
    Issue(CertificateRequirement),
    /// Read a published ARN from `parameter_name` in `region`
    Lookup { parameter_name: String, region: Region },
}

impl CertificateSource {
    /// Pick issue or lookup for `stack`
    ///
    /// The certificate is issued when the stack runs in the certificate
    /// region and looked up from there otherwise.
    pub fn select(requirement: &CertificateRequirement, stack: &StackConfig) -> Self {
        if stack.issues_certificate() {
            CertificateSource::Issue(requirement.clone())
        } else {
            CertificateSource::Lookup {
                parameter_name: requirement.parameter_name.clone(),
                region: stack.certificate_region.clone(),
            }
        }
    }
}

/// A certificate bound to this stack
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateHandle {
    /// Deferred certificate ARN
    pub arn: Expr,

    /// Names the certificate covers; `None` when looked up and trusted
    pub covered_names: Option<Vec<CertificateName>>,

    /// The cross-region read backing a looked-up certificate
    pub parameter: Option<CrossRegionParameter>,
}

impl CertificateHandle {
    /// Whether `domain` is served by this certificate
    pub fn covers(&self, domain: &DomainName) -> bool {
        match &self.covered_names {
            Some(names) => names.iter().any(|name| name.covers(domain)),
            None => true,
        }
    }

    /// Fail on the first alias the certificate does not cover
    pub fn ensure_covers(&self, aliases: &[DomainName]) -> TopologyResult<()> {
        match aliases.iter().find(|alias| !self.covers(alias)) {
            None => Ok(()),
            Some(alias) => Err(TopologyError::AliasNotCovered {
                alias: alias.to_string(),
                covered: self
                    .covered_names
                    .iter()
                    .flatten()
                    .map(ToString::to_string)
                    .collect(),
            }),
        }
    }

    /// Whether this stack issued the certificate
    pub fn is_issued(&self) -> bool {
        self.parameter.is_none()
    }
}

/// Declares or looks up the shared certificate
#[derive(Debug, Default)]
pub struct CertificateResolver;

impl CertificateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Bind the certificate described by `source` into `graph`
    pub fn resolve(
        &self,
        graph: &mut ResourceGraph,
        parameters: &mut CrossRegionParameterResolver,
        source: &CertificateSource,
    ) -> TopologyResult<CertificateHandle> {
        match source {
            CertificateSource::Issue(requirement) => self.issue(graph, requirement),
            CertificateSource::Lookup {
                parameter_name,
                region,
            } => {
                info!(parameter = %parameter_name, region = %region, "Looking up shared certificate");
                let parameter = parameters.resolve(graph, parameter_name, region)?;
                Ok(CertificateHandle {
                    arn: parameter.reference(),
                    covered_names: None,
                    parameter: Some(parameter),
                })
            }
        }
    }

    fn issue(
        &self,
        graph: &mut ResourceGraph,
        requirement: &CertificateRequirement,
    ) -> TopologyResult<CertificateHandle> {
        let names = requirement.covered_names();
        info!(
            domain = %requirement.domain_name,
            names = names.len(),
            "Issuing shared certificate"
        );

        let validation: Vec<Value> = names
            .iter()
            .filter_map(|name| {
                requirement.validation_zone_for(name).map(|zone_id| {
                    json!({ "DomainName": name.to_string(), "HostedZoneId": zone_id })
                })
            })
            .collect();

        let mut properties = json!({
            "DomainName": requirement.domain_name.to_string(),
            "ValidationMethod": "DNS",
        });
        let sans: Vec<String> = names.iter().skip(1).map(ToString::to_string).collect();
        if !sans.is_empty() {
            properties["SubjectAlternativeNames"] = json!(sans);
        }
        if !validation.is_empty() {
            properties["DomainValidationOptions"] = Value::Array(validation);
        }

        let certificate = graph.add(
            LogicalId::new(CERTIFICATE_ID)?,
            Resource::new(CERTIFICATE_TYPE, properties),
        )?;
        let arn = Expr::Ref(certificate);

        graph.add(
            LogicalId::new(CERTIFICATE_PARAMETER_ID)?,
            Resource::new(
                PARAMETER_TYPE,
                json!({
                    "Name": requirement.parameter_name,
                    "Type": "String",
                    "Description": PARAMETER_DESCRIPTION,
                    "Value": arn,
                }),
            ),
        )?;

        Ok(CertificateHandle {
            arn,
            covered_names: Some(names),
            parameter: None,
        })
    }
}
