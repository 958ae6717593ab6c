// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topology Builds
//!
//! Documents are generated from a small vocabulary of zone names and alias
//! labels. Every generated document is valid and fully covered by the
//! shared certificate.

use proptest::prelude::*;
use std::collections::BTreeSet;

use zone_topology::distribution::DISTRIBUTION_TYPE;
use zone_topology::dns::RECORD_SET_TYPE;
use zone_topology::{ConfigStore, StackConfig, TopologyBuilder, TopologyStack};

const ALIAS_LABELS: [&str; 4] = ["www", "app", "api", "docs"];

#[derive(Debug, Clone)]
struct GeneratedZone {
    name: String,
    aliases: Vec<&'static str>,
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn zone_name() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{1,8}", prop_oneof![Just("com"), Just("org"), Just("net")])
        .prop_map(|(label, tld)| format!("{}.{}", label, tld))
}

fn alias_labels() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(ALIAS_LABELS.to_vec(), 0..=ALIAS_LABELS.len())
}

fn zones() -> impl Strategy<Value = Vec<GeneratedZone>> {
    prop::collection::btree_set(zone_name(), 1..5).prop_flat_map(|names: BTreeSet<String>| {
        let count = names.len();
        prop::collection::vec(alias_labels(), count).prop_map(move |aliases| {
            names
                .iter()
                .cloned()
                .zip(aliases)
                .map(|(name, aliases)| GeneratedZone { name, aliases })
                .collect()
        })
    })
}

fn stack() -> impl Strategy<Value = StackConfig> {
    prop_oneof![
        Just(StackConfig::default()),
        Just(StackConfig::new(
            "eu-web-stack",
            zone_topology::domain::Region::new("eu-west-1").expect("valid region"),
        )),
    ]
}

/// Render a document whose certificate covers every zone and alias
fn document(zones: &[GeneratedZone]) -> String {
    let mut sans = Vec::new();
    for zone in zones {
        sans.push(format!("\"{}\"", zone.name));
        sans.push(format!("\"*.{}\"", zone.name));
    }

    let mut yaml = format!(
        "aws:\n  region: us-east-1\nappCert:\n  domainName: {}\n  subjectAlternativeNames: [{}]\n  ssmParameterName: /web/certificate-arn\nzoneS3Cloudfront:\n",
        zones[0].name,
        sans.join(", ")
    );
    for zone in zones {
        yaml.push_str(&format!(
            "  - zoneName: {}\n    bucket: {}\n    alias: [{}]\n",
            zone.name,
            zone.name,
            zone.aliases.join(", ")
        ));
    }
    yaml
}

fn build(yaml: &str, stack: StackConfig) -> TopologyStack {
    let store = ConfigStore::from_yaml_str(yaml).expect("generated document parses");
    TopologyBuilder::new(&store, stack)
        .build()
        .expect("generated document builds")
}

fn count_records(built: &TopologyStack, kind: &str) -> usize {
    built
        .graph
        .resources_of_type(RECORD_SET_TYPE)
        .filter(|(_, resource)| resource.properties["Type"] == kind)
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Builds are deterministic
    ///
    /// The same document and stack settings produce an identical graph and
    /// byte-identical template.
    #[test]
    fn prop_build_is_deterministic(zones in zones(), stack in stack()) {
        let yaml = document(&zones);
        let first = build(&yaml, stack.clone());
        let second = build(&yaml, stack);

        prop_assert_eq!(&first.graph, &second.graph);
        prop_assert_eq!(
            first.to_json_pretty().expect("serializes"),
            second.to_json_pretty().expect("serializes")
        );
    }

    /// Property: One apex record per zone, one CNAME per alias label
    #[test]
    fn prop_record_counts_follow_zones(zones in zones(), stack in stack()) {
        let built = build(&document(&zones), stack);
        let labels: usize = zones.iter().map(|zone| zone.aliases.len()).sum();

        prop_assert_eq!(count_records(&built, "A"), zones.len());
        prop_assert_eq!(count_records(&built, "CNAME"), labels);
        prop_assert_eq!(built.graph.resources_of_type(DISTRIBUTION_TYPE).count(), zones.len());
    }

    /// Property: Every distribution serves its aliases plus the apex, apex last
    #[test]
    fn prop_distribution_aliases_end_with_apex(zones in zones()) {
        let built = build(&document(&zones), StackConfig::default());

        for (generated, zone) in zones.iter().zip(&built.zones) {
            let aliases = &zone.distribution.domain_aliases;
            prop_assert_eq!(aliases.len(), generated.aliases.len() + 1);
            prop_assert_eq!(aliases.last().map(|name| name.as_str()), Some(generated.name.as_str()));
        }
    }

    /// Property: Error fallbacks are the same for every distribution
    #[test]
    fn prop_error_fallbacks_are_fixed(zones in zones()) {
        let built = build(&document(&zones), StackConfig::default());

        for (_, resource) in built.graph.resources_of_type(DISTRIBUTION_TYPE) {
            let responses = resource.properties["DistributionConfig"]["CustomErrorResponses"]
                .as_array()
                .cloned()
                .unwrap_or_default();
            let codes: Vec<u64> = responses
                .iter()
                .filter_map(|response| response["ErrorCode"].as_u64())
                .collect();
            prop_assert_eq!(codes, vec![403, 404]);
            for response in &responses {
                prop_assert_eq!(response["ResponseCode"].as_u64(), Some(200));
                prop_assert_eq!(response["ResponsePagePath"].as_str(), Some("/index.html"));
                prop_assert_eq!(response["ErrorCachingMinTTL"].as_u64(), Some(86400));
            }
        }
    }
}
