// Copyright (c) 2025 - Cowboy AI, Inc.
//! CDN Distribution
//!
//! Every zone gets one distribution in front of one storage origin:
//!
//! - default behavior forwards to the origin, compressed, HTTPS enforced
//! - 403 and 404 fall back to `/index.html` with status 200
//! - aliases are only served with a certificate bound
//!
//! The configuration is built as typed values, serialized, and then patched
//! with the origin's access-control id (see [`patch`]).

pub mod origin;
pub mod patch;

pub use origin::{OriginAccessControl, StorageOrigin};
pub use patch::{OriginBinding, OriginBindingField};

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::certificate::CertificateHandle;
use crate::config::StackConfig;
use crate::domain::DomainName;
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{Expr, LogicalId, Resource, ResourceGraph};

pub const DISTRIBUTION_TYPE: &str = "AWS::CloudFront::Distribution";

/// Error page every fallback response serves
pub const FALLBACK_PAGE: &str = "/index.html";

/// Seconds an error response is cached
pub const ERROR_CACHING_MIN_TTL: u64 = 86_400;

const ORIGIN_ID: &str = "origin1";

/// Error code rewritten to a page response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
    #[serde(rename = "ErrorCachingMinTTL")]
    pub error_caching_min_ttl: u64,
}

impl ErrorResponse {
    /// Serve the fallback page with 200 for `error_code`
    pub fn fallback(error_code: u16) -> Self {
        Self {
            error_code,
            response_code: 200,
            response_page_path: FALLBACK_PAGE.to_string(),
            error_caching_min_ttl: ERROR_CACHING_MIN_TTL,
        }
    }

    /// The 403 and 404 fallbacks, in that order
    pub fn defaults() -> Vec<Self> {
        vec![Self::fallback(403), Self::fallback(404)]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aliases: Vec<String>,
    comment: String,
    custom_error_responses: Vec<ErrorResponse>,
    default_cache_behavior: CacheBehavior,
    default_root_object: &'static str,
    enabled: bool,
    http_version: &'static str,
    #[serde(rename = "IPV6Enabled")]
    ipv6_enabled: bool,
    origins: Vec<Origin>,
    price_class: String,
    viewer_certificate: ViewerCertificate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Origin {
    domain_name: String,
    id: &'static str,
    s3_origin_config: S3OriginConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct S3OriginConfig {
    origin_access_identity: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CacheBehavior {
    allowed_methods: [&'static str; 3],
    cached_methods: [&'static str; 2],
    compress: bool,
    forwarded_values: ForwardedValues,
    target_origin_id: &'static str,
    viewer_protocol_policy: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForwardedValues {
    query_string: bool,
    cookies: Cookies,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Cookies {
    forward: &'static str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ViewerCertificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    acm_certificate_arn: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssl_support_method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cloud_front_default_certificate: Option<bool>,
}

impl CacheBehavior {
    fn forward_to_origin() -> Self {
        Self {
            allowed_methods: ["GET", "HEAD", "OPTIONS"],
            cached_methods: ["GET", "HEAD"],
            compress: true,
            forwarded_values: ForwardedValues {
                query_string: false,
                cookies: Cookies { forward: "none" },
            },
            target_origin_id: ORIGIN_ID,
            viewer_protocol_policy: "redirect-to-https",
        }
    }
}

/// A distribution declared in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionTopology {
    /// Logical id of the distribution resource
    pub distribution_id: LogicalId,
    pub origin: StorageOrigin,
    /// Names the distribution answers for
    pub domain_aliases: Vec<DomainName>,
    pub certificate_arn: Option<Expr>,
    pub access_control_id: Expr,
}

impl DistributionTopology {
    /// Deferred `*.cloudfront.net` domain name
    pub fn domain_name(&self) -> Expr {
        Expr::get_att(&self.distribution_id, "DomainName")
    }
}

/// Builds one distribution per zone
#[derive(Debug, Clone)]
pub struct DistributionBuilder {
    price_class: String,
    minimum_protocol_version: String,
}

impl DistributionBuilder {
    pub fn new(stack: &StackConfig) -> Self {
        Self {
            price_class: stack.price_class.clone(),
            minimum_protocol_version: stack.minimum_protocol_version.clone(),
        }
    }

    /// Declare the distribution for `zone_name`
    ///
    /// Fails with [`TopologyError::AliasWithoutCertificate`] when `aliases`
    /// is non-empty and no certificate is bound, and with
    /// [`TopologyError::CertificateWithoutAliases`] when a certificate is
    /// bound but `aliases` is empty. Both fail before anything is added to
    /// the graph.
    pub fn build(
        &self,
        graph: &mut ResourceGraph,
        zone_name: &DomainName,
        origin: &StorageOrigin,
        aliases: &[DomainName],
        certificate: Option<&CertificateHandle>,
        access_control_id: &Expr,
    ) -> TopologyResult<DistributionTopology> {
        let viewer_certificate = match certificate {
            Some(_) if aliases.is_empty() => {
                return Err(TopologyError::CertificateWithoutAliases {
                    zone: zone_name.to_string(),
                });
            }
            Some(handle) => {
                handle.ensure_covers(aliases)?;
                ViewerCertificate {
                    acm_certificate_arn: Some(handle.arn.clone()),
                    ssl_support_method: Some("sni-only"),
                    minimum_protocol_version: Some(self.minimum_protocol_version.clone()),
                    ..ViewerCertificate::default()
                }
            }
            None if !aliases.is_empty() => {
                return Err(TopologyError::AliasWithoutCertificate {
                    zone: zone_name.to_string(),
                    aliases: aliases.iter().map(ToString::to_string).collect(),
                });
            }
            None => ViewerCertificate {
                cloud_front_default_certificate: Some(true),
                ..ViewerCertificate::default()
            },
        };

        let config = DistributionConfig {
            aliases: aliases.iter().map(ToString::to_string).collect(),
            comment: format!("{} - CloudFront Distribution", zone_name),
            custom_error_responses: ErrorResponse::defaults(),
            default_cache_behavior: CacheBehavior::forward_to_origin(),
            default_root_object: "index.html",
            enabled: true,
            http_version: "http2",
            ipv6_enabled: true,
            origins: vec![Origin {
                domain_name: origin.regional_domain_name(),
                id: ORIGIN_ID,
                s3_origin_config: S3OriginConfig {
                    origin_access_identity: "",
                },
            }],
            price_class: self.price_class.clone(),
            viewer_certificate,
        };

        let id = LogicalId::derive("CloudFront", zone_name.as_str())?;
        let mut resource = Resource::new(
            DISTRIBUTION_TYPE,
            json!({ "DistributionConfig": serde_json::to_value(&config)? }),
        );
        OriginBinding::ACCESS_CONTROL.apply(&id, &mut resource, access_control_id.to_json())?;

        let distribution_id = graph.add(id, resource)?;
        info!(
            zone = %zone_name,
            distribution = %distribution_id,
            aliases = aliases.len(),
            tls = certificate.is_some(),
            "Declared distribution"
        );

        Ok(DistributionTopology {
            distribution_id,
            origin: origin.clone(),
            domain_aliases: aliases.to_vec(),
            certificate_arn: certificate.map(|handle| handle.arn.clone()),
            access_control_id: access_control_id.clone(),
        })
    }
}
