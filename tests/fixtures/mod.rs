// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for zone-topology
//!
//! Deterministic configuration documents and stack settings. Tests build
//! their inputs from here instead of writing YAML inline.

#![allow(dead_code)]

use zone_topology::domain::Region;
use zone_topology::{ConfigStore, StackConfig};

pub const CERTIFICATE_PARAMETER: &str = "/web/certificate-arn";

/// One zone, no aliases, no certificate
pub const APEX_ONLY: &str = r#"
aws:
  region: us-east-1
zoneS3Cloudfront:
  - zoneName: example.com
    bucket: example.com
"#;

/// One zone with a `www` alias and the shared certificate
pub const WITH_WWW_ALIAS: &str = r#"
aws:
  region: us-east-1
appCert:
  domainName: example.com
  subjectAlternativeNames: ["*.example.com"]
  ssmParameterName: /web/certificate-arn
hosted-zones:
  example.com: Z0EXAMPLE
zoneS3Cloudfront:
  - zoneName: example.com
    bucket: example.com
    alias: [www]
"#;

/// Aliases declared but no certificate configured
pub const ALIAS_WITHOUT_CERTIFICATE: &str = r#"
aws:
  region: us-east-1
zoneS3Cloudfront:
  - zoneName: example.com
    bucket: example.com
    alias: [www]
"#;

/// Two zones sharing one certificate
pub const TWO_ZONES: &str = r#"
aws:
  region: eu-west-1
appCert:
  domainName: example.com
  subjectAlternativeNames: ["*.example.com", "example.org", "*.example.org"]
  ssmParameterName: /web/certificate-arn
hosted-zones:
  example.com: Z0EXAMPLE
  example.org: Z0ORG
zoneS3Cloudfront:
  - zoneName: example.com
    bucket: example-com-site
    alias: [www, app]
  - zoneName: example.org
    bucket: example-org-site
    alias: [www]
"#;

/// Zones and alias labels that differ only by `-` versus `.`
pub const HYPHEN_DOT_TWINS: &str = r#"
aws:
  region: us-east-1
appCert:
  domainName: my-site.com
  subjectAlternativeNames:
    - "*.my-site.com"
    - "a.b.my-site.com"
    - "my.site.com"
    - "*.my.site.com"
    - "a.b.my.site.com"
  ssmParameterName: /web/certificate-arn
zoneS3Cloudfront:
  - zoneName: my-site.com
    bucket: my-site.com
    alias: [a-b, a.b]
  - zoneName: my.site.com
    bucket: my.site.com
    alias: [a-b, a.b]
"#;

pub fn store(document: &str) -> ConfigStore {
    ConfigStore::from_yaml_str(document).expect("fixture document must parse")
}

/// Stack deployed to the certificate region: issues the certificate
pub fn issuing_stack() -> StackConfig {
    StackConfig::default().with_account("123456789012")
}

/// Stack deployed elsewhere: looks the certificate up
pub fn lookup_stack() -> StackConfig {
    StackConfig::new("eu-web-stack", region("eu-west-1")).with_account("123456789012")
}

pub fn region(name: &str) -> Region {
    Region::new(name).expect("fixture region must be valid")
}
