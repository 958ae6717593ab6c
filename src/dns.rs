// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS Binding
//!
//! Points a zone at its distribution: the apex gets an alias `A` record and
//! every alias label gets a `CNAME` to the distribution's domain name.

use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::StackConfig;
use crate::distribution::DistributionTopology;
use crate::domain::{AliasLabel, DomainName};
use crate::errors::TopologyResult;
use crate::graph::{Expr, LogicalId, Resource, ResourceGraph};

pub const HOSTED_ZONE_TYPE: &str = "AWS::Route53::HostedZone";
pub const RECORD_SET_TYPE: &str = "AWS::Route53::RecordSet";

/// Hosted zone id every CDN alias target lives in
pub const CDN_ALIAS_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// TTL of alias CNAME records, in seconds
pub const CNAME_TTL: u32 = 1800;

/// Where a zone's hosted zone comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostedZoneSource {
    /// Declare a new public hosted zone
    Create,
    /// Reuse a hosted zone by id
    Existing(String),
}

/// One `label.zone → distribution` entry
#[derive(Debug, Clone, PartialEq)]
pub struct CnameEntry {
    pub label: AliasLabel,
    pub record_name: DomainName,
    pub record_id: LogicalId,
    pub target: Expr,
}

/// Records bound for one zone
#[derive(Debug, Clone, PartialEq)]
pub struct DnsRecordSet {
    pub hosted_zone_name: DomainName,
    pub hosted_zone: HostedZoneSource,
    /// Deferred (created) or literal (reused) hosted zone id
    pub hosted_zone_id: Expr,
    pub apex_record_id: LogicalId,
    pub apex_alias_target: Expr,
    pub cname_entries: Vec<CnameEntry>,
}

impl DnsRecordSet {
    /// Record names in declaration order, apex first
    pub fn record_names(&self) -> Vec<&DomainName> {
        std::iter::once(&self.hosted_zone_name)
            .chain(self.cname_entries.iter().map(|entry| &entry.record_name))
            .collect()
    }
}

/// Declares hosted zones and records
#[derive(Debug, Clone, Default)]
pub struct DnsBinder {
    existing_hosted_zones: BTreeMap<DomainName, String>,
}

impl DnsBinder {
    pub fn new(stack: &StackConfig) -> Self {
        Self {
            existing_hosted_zones: stack.existing_hosted_zones.clone(),
        }
    }

    /// How the hosted zone for `zone_name` is obtained
    pub fn hosted_zone_source(&self, zone_name: &DomainName) -> HostedZoneSource {
        match self.existing_hosted_zones.get(zone_name) {
            Some(id) => HostedZoneSource::Existing(id.clone()),
            None => HostedZoneSource::Create,
        }
    }

    /// Bind `zone_name` and each alias label to the distribution
    pub fn bind(
        &self,
        graph: &mut ResourceGraph,
        topology: &DistributionTopology,
        zone_name: &DomainName,
        alias_labels: &[AliasLabel],
    ) -> TopologyResult<DnsRecordSet> {
        let hosted_zone = self.hosted_zone_source(zone_name);
        let hosted_zone_id = match &hosted_zone {
            HostedZoneSource::Existing(id) => {
                debug!(zone = %zone_name, hosted_zone = %id, "Reusing hosted zone");
                Expr::literal(id.as_str())
            }
            HostedZoneSource::Create => {
                let id = graph.add(
                    LogicalId::derive("HostedZone", zone_name.as_str())?,
                    Resource::new(HOSTED_ZONE_TYPE, json!({ "Name": fqdn(zone_name) })),
                )?;
                Expr::Ref(id)
            }
        };

        let target = topology.domain_name();
        let apex_record_id = graph.add(
            LogicalId::derive("ARecord", zone_name.as_str())?,
            Resource::new(
                RECORD_SET_TYPE,
                json!({
                    "Name": fqdn(zone_name),
                    "Type": "A",
                    "HostedZoneId": hosted_zone_id,
                    "AliasTarget": {
                        "DNSName": target,
                        "HostedZoneId": CDN_ALIAS_HOSTED_ZONE_ID,
                    },
                }),
            ),
        )?;

        let mut cname_entries = Vec::with_capacity(alias_labels.len());
        for label in alias_labels {
            let record_name = zone_name.with_alias(label)?;
            let record_id = graph.add(
                LogicalId::derive("Cname", record_name.as_str())?,
                Resource::new(
                    RECORD_SET_TYPE,
                    json!({
                        "Name": fqdn(&record_name),
                        "Type": "CNAME",
                        "HostedZoneId": hosted_zone_id,
                        "ResourceRecords": [target],
                        "TTL": CNAME_TTL.to_string(),
                    }),
                ),
            )?;
            cname_entries.push(CnameEntry {
                label: label.clone(),
                record_name,
                record_id,
                target: target.clone(),
            });
        }

        let created_zone = hosted_zone == HostedZoneSource::Create;
        info!(
            zone = %zone_name,
            cnames = cname_entries.len(),
            created_zone,
            "Bound DNS records"
        );

        Ok(DnsRecordSet {
            hosted_zone_name: zone_name.clone(),
            hosted_zone,
            hosted_zone_id,
            apex_record_id,
            apex_alias_target: target,
            cname_entries,
        })
    }
}

fn fqdn(name: &DomainName) -> String {
    format!("{}.", name)
}
