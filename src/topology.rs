// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone Topology Pipeline
//!
//! One pass over the configured zones, in declared order:
//!
//! ```text
//! certificate (once) ─┐
//! access control (once)┤
//!                      └─ per zone: distribution → patch → DNS records
//! ```
//!
//! Nothing here performs I/O. The result is a [`ResourceGraph`] that an
//! external engine applies.

use tracing::{debug, info};

use crate::certificate::{CertificateHandle, CertificateResolver, CertificateSource};
use crate::config::{ConfigStore, InfraDocument, StackConfig};
use crate::distribution::{DistributionBuilder, DistributionTopology, OriginAccessControl, StorageOrigin};
use crate::dns::{DnsBinder, DnsRecordSet};
use crate::domain::ZoneSpec;
use crate::errors::TopologyResult;
use crate::graph::{Expr, LogicalId, Output, ResourceGraph};
use crate::parameter::CrossRegionParameterResolver;

/// Output carrying the shared certificate's ARN
pub const CERTIFICATE_ARN_OUTPUT: &str = "CertificateArn";

/// Everything declared for one zone
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTopology {
    pub zone: ZoneSpec,
    pub distribution: DistributionTopology,
    pub records: DnsRecordSet,
}

/// A fully built stack
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyStack {
    pub stack: StackConfig,
    pub graph: ResourceGraph,
    pub certificate: Option<CertificateHandle>,
    pub zones: Vec<ZoneTopology>,
}

impl TopologyStack {
    /// Deferred ARN of the shared certificate
    pub fn certificate_arn(&self) -> Option<&Expr> {
        self.certificate.as_ref().map(|handle| &handle.arn)
    }

    pub fn zone(&self, zone_name: &str) -> Option<&ZoneTopology> {
        self.zones
            .iter()
            .find(|zone| zone.zone.zone_name.as_str() == zone_name)
    }

    pub fn to_json_pretty(&self) -> TopologyResult<String> {
        self.graph.to_json_pretty()
    }
}

/// Builds the whole stack from a configuration document
pub struct TopologyBuilder<'a> {
    store: &'a ConfigStore,
    stack: StackConfig,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(store: &'a ConfigStore, stack: StackConfig) -> Self {
        Self { store, stack }
    }

    /// Run the pipeline
    pub fn build(self) -> TopologyResult<TopologyStack> {
        let document = InfraDocument::from_store(self.store)?;
        info!(
            stack = %self.stack.stack_name,
            region = %self.stack.region,
            zones = document.zones.len(),
            "Building zone topology"
        );

        let mut graph = ResourceGraph::new(format!("{} zone topology", self.stack.stack_name));
        let account = self.stack.account_id();
        let mut parameters =
            CrossRegionParameterResolver::new(self.stack.region.clone()).with_account(account.clone());

        let certificate = match &document.certificate {
            Some(requirement) => {
                let source = CertificateSource::select(requirement, &self.stack);
                let handle = CertificateResolver::new().resolve(&mut graph, &mut parameters, &source)?;
                graph.add_output(
                    CERTIFICATE_ARN_OUTPUT,
                    Output {
                        value: handle.arn.clone(),
                        description: Some("Shared certificate ARN".to_string()),
                        export_name: None,
                    },
                );
                Some(handle)
            }
            None => {
                debug!("No certificate configured; distributions use the default certificate");
                None
            }
        };

        let access_control = OriginAccessControl::declare(&mut graph)?;
        let distributions = DistributionBuilder::new(&self.stack);
        let dns = DnsBinder::new(&self.stack);

        let mut zones = Vec::with_capacity(document.zones.len());
        for zone in document.zones {
            debug!(zone = %zone.zone_name, bucket = %zone.bucket_name, "Building zone");

            let origin = StorageOrigin::from_bucket_name(&zone.bucket_name, document.aws.region.clone())?;
            // the apex can only be an alias when a certificate covers it
            let aliases = if certificate.is_some() {
                zone.distribution_aliases()?
            } else {
                zone.alias_domains()?
            };

            let distribution = distributions.build(
                &mut graph,
                &zone.zone_name,
                &origin,
                &aliases,
                certificate.as_ref(),
                &access_control.access_control_id(),
            )?;
            origin.grant_read(&mut graph, &distribution.distribution_id, &account)?;
            let records = dns.bind(&mut graph, &distribution, &zone.zone_name, &zone.alias_labels)?;

            let output = LogicalId::derive("DistributionDomain", zone.zone_name.as_str())?;
            graph.add_output(
                output.as_str(),
                Output {
                    value: distribution.domain_name(),
                    description: Some(format!("Distribution domain for {}", zone.zone_name)),
                    export_name: None,
                },
            );

            info!(zone = %zone.zone_name, resources = graph.len(), "Zone complete");
            zones.push(ZoneTopology {
                zone,
                distribution,
                records,
            });
        }

        Ok(TopologyStack {
            stack: self.stack,
            graph,
            certificate,
            zones,
        })
    }
}

/// Build the resource graph for `store` with `stack` settings
pub fn build_topology(store: &ConfigStore, stack: StackConfig) -> TopologyResult<ResourceGraph> {
    TopologyBuilder::new(store, stack).build().map(|built| built.graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TopologyError;

    const DOCUMENT: &str = r#"
aws:
  region: us-east-1
appCert:
  domainName: example.com
  subjectAlternativeNames: ["*.example.com"]
  ssmParameterName: /web/cert-arn
hosted-zones:
  example.com: Z111
zoneS3Cloudfront:
  - zoneName: example.com
    bucket: example.com
    alias: [www]
"#;

    #[test]
    fn test_pipeline_order() {
        let store = ConfigStore::from_yaml_str(DOCUMENT).unwrap();
        let built = TopologyBuilder::new(&store, StackConfig::default()).build().unwrap();

        let ids: Vec<&str> = built.graph.resources().map(|(id, _)| id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "AppCertificate",
                "AppCertificateArnParameter",
                "CloudFrontOriginAccessControl",
                "CloudFrontExampleCom",
                "BucketPolicyExampleCom",
                "HostedZoneExampleCom",
                "ARecordExampleCom",
                "CnameWwwExampleCom",
            ]
        );
        assert!(built.graph.output(CERTIFICATE_ARN_OUTPUT).is_some());
        assert!(built.graph.output("DistributionDomainExampleCom").is_some());
    }

    #[test]
    fn test_aliases_without_certificate() {
        let store = ConfigStore::from_yaml_str(
            "aws: { region: us-east-1 }\nzoneS3Cloudfront:\n  - { zoneName: example.com, bucket: example.com, alias: [www] }\n",
        )
        .unwrap();
        let err = build_topology(&store, StackConfig::default()).unwrap_err();
        assert!(matches!(err, TopologyError::AliasWithoutCertificate { .. }));
    }
}
