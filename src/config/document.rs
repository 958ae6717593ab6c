// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed view of the infrastructure document
//!
//! ```yaml
//! aws:
//!   region: eu-west-1
//! appCert:
//!   domainName: example.com
//!   subjectAlternativeNames: ["*.example.com"]
//!   ssmParameterName: /web/certificate-arn
//! hosted-zones:
//!   example.com: Z0123456789
//! zoneS3Cloudfront:
//!   - zoneName: example.com
//!     bucket: example.com
//!     alias: [www]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use super::ConfigStore;
use crate::domain::{
    AliasLabel, CertificateName, CertificateRequirement, DomainName, Region, ZoneSpec,
};
use crate::errors::{TopologyError, TopologyResult};

pub const AWS_KEY: &str = "aws";
pub const APP_CERT_KEY: &str = "appCert";
pub const HOSTED_ZONES_KEY: &str = "hosted-zones";
pub const ZONES_KEY: &str = "zoneS3Cloudfront";

/// `aws` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AwsSection {
    /// Region of the origin buckets
    pub region: Region,
}

/// `appCert` section, as written in the document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCertificate {
    pub domain_name: String,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    pub ssm_parameter_name: String,
}

/// One `zoneS3Cloudfront` entry, as written in the document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEntry {
    pub zone_name: String,
    pub bucket: String,
    #[serde(default)]
    pub alias: Option<Vec<String>>,
}

/// Validated infrastructure document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraDocument {
    pub aws: AwsSection,
    pub certificate: Option<CertificateRequirement>,
    pub zones: Vec<ZoneSpec>,
}

impl InfraDocument {
    /// Read and validate every section the topology builder needs
    pub fn from_store(store: &ConfigStore) -> TopologyResult<Self> {
        let aws: AwsSection = store.required(AWS_KEY)?;
        let hosted_zones: BTreeMap<String, String> =
            store.typed(HOSTED_ZONES_KEY)?.unwrap_or_default();
        let app_cert: Option<AppCertificate> = store.typed(APP_CERT_KEY)?;
        let entries: Vec<ZoneEntry> = store.required(ZONES_KEY)?;

        let certificate = app_cert
            .map(|cert| certificate_requirement(cert, &hosted_zones))
            .transpose()?;

        let zones = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| zone_spec(index, entry))
            .collect::<TopologyResult<Vec<_>>>()?;

        Ok(Self {
            aws,
            certificate,
            zones,
        })
    }
}

fn certificate_requirement(
    cert: AppCertificate,
    hosted_zones: &BTreeMap<String, String>,
) -> TopologyResult<CertificateRequirement> {
    let name = |field: &str, value: &str| {
        CertificateName::new(value)
            .map_err(|e| TopologyError::shape(format!("{}.{}", APP_CERT_KEY, field), e))
    };

    if cert.ssm_parameter_name.trim().is_empty() {
        return Err(TopologyError::shape(
            format!("{}.ssmParameterName", APP_CERT_KEY),
            "must not be empty",
        ));
    }

    let domain_name = name("domainName", cert.domain_name.as_str())?;
    let subject_alternative_names = cert
        .subject_alternative_names
        .iter()
        .map(|san| name("subjectAlternativeNames", san.as_str()))
        .collect::<TopologyResult<_>>()?;

    let validation_zones = hosted_zones
        .iter()
        .map(|(domain, zone_id)| {
            DomainName::new(domain)
                .map(|domain| (domain, zone_id.clone()))
                .map_err(|e| TopologyError::shape(HOSTED_ZONES_KEY, e))
        })
        .collect::<TopologyResult<_>>()?;

    Ok(CertificateRequirement {
        domain_name,
        subject_alternative_names,
        validation_zones,
        parameter_name: cert.ssm_parameter_name,
    })
}

fn zone_spec(index: usize, entry: ZoneEntry) -> TopologyResult<ZoneSpec> {
    let key = |field: &str| format!("{}[{}].{}", ZONES_KEY, index, field);

    let zone_name =
        DomainName::new(&entry.zone_name).map_err(|e| TopologyError::shape(key("zoneName"), e))?;

    if entry.bucket.trim().is_empty() {
        return Err(TopologyError::shape(key("bucket"), "must not be empty"));
    }

    let labels = entry
        .alias
        .unwrap_or_default()
        .iter()
        .map(|alias| {
            AliasLabel::new(alias)
                .and_then(|label| zone_name.with_alias(&label).map(|_| label))
                .map_err(|e| TopologyError::shape(key("alias"), e))
        })
        .collect::<TopologyResult<Vec<_>>>()?;

    Ok(ZoneSpec::new(zone_name, entry.bucket).with_aliases(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL: &str = r#"
aws:
  region: eu-west-1
appCert:
  domainName: example.com
  subjectAlternativeNames: ["*.example.com", "example.org"]
  ssmParameterName: /web/certificate-arn
hosted-zones:
  example.com: Z111
  example.org: Z222
zoneS3Cloudfront:
  - zoneName: example.com
    bucket: example.com
    alias: [www]
  - zoneName: example.org
    bucket: example-org-site
"#;

    #[test]
    fn test_full_document() {
        let store = ConfigStore::from_yaml_str(FULL).unwrap();
        let document = InfraDocument::from_store(&store).unwrap();

        assert_eq!(document.aws.region.as_str(), "eu-west-1");
        assert_eq!(document.zones.len(), 2);
        assert_eq!(document.zones[0].alias_labels, vec![AliasLabel::new("www").unwrap()]);
        assert!(document.zones[1].alias_labels.is_empty());
        assert_eq!(document.zones[1].bucket_name, "example-org-site");

        let cert = document.certificate.unwrap();
        assert_eq!(cert.domain_name.to_string(), "example.com");
        assert_eq!(cert.subject_alternative_names.len(), 2);
        assert_eq!(cert.validation_zones.len(), 2);
        assert_eq!(cert.parameter_name, "/web/certificate-arn");
    }

    #[test]
    fn test_certificate_is_optional() {
        let store = ConfigStore::from_yaml_str(
            "aws: { region: us-east-1 }\nzoneS3Cloudfront:\n  - { zoneName: example.com, bucket: example.com }\n",
        )
        .unwrap();
        let document = InfraDocument::from_store(&store).unwrap();
        assert!(document.certificate.is_none());
    }

    #[test]
    fn test_missing_zone_list_is_shape_error() {
        let store = ConfigStore::from_yaml_str("aws: { region: us-east-1 }").unwrap();
        let err = InfraDocument::from_store(&store).unwrap_err();
        assert!(matches!(err, TopologyError::ConfigShape { ref key, .. } if key == ZONES_KEY));
    }

    #[test]
    fn test_bad_zone_name_names_the_entry() {
        let store = ConfigStore::from_yaml_str(
            "aws: { region: us-east-1 }\nzoneS3Cloudfront:\n  - { zoneName: localhost, bucket: b }\n",
        )
        .unwrap();
        let err = InfraDocument::from_store(&store).unwrap_err();
        assert!(
            matches!(err, TopologyError::ConfigShape { ref key, .. } if key == "zoneS3Cloudfront[0].zoneName")
        );
    }

    #[test]
    fn test_alias_overflowing_zone_length_names_the_entry() {
        let label = "a".repeat(60);
        let document = format!(
            "aws: {{ region: us-east-1 }}\nzoneS3Cloudfront:\n  - {{ zoneName: {label}.{label}.{label}.{label}.com, bucket: b, alias: [{}] }}\n",
            "c".repeat(63)
        );
        let store = ConfigStore::from_yaml_str(&document).unwrap();
        let err = InfraDocument::from_store(&store).unwrap_err();
        assert!(
            matches!(err, TopologyError::ConfigShape { ref key, .. } if key == "zoneS3Cloudfront[0].alias")
        );
    }

    #[test]
    fn test_bad_region_is_shape_error() {
        let store = ConfigStore::from_yaml_str(
            "aws: { region: moon }\nzoneS3Cloudfront: []\n",
        )
        .unwrap();
        assert!(matches!(
            InfraDocument::from_store(&store),
            Err(TopologyError::ConfigShape { ref key, .. }) if key == AWS_KEY
        ));
    }
}
