// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarative Resource Graph
//!
//! The topology builder never talks to a provider. Everything it does ends up
//! as a node in a [`ResourceGraph`]: a typed resource with properties and
//! explicit dependency edges, serialized as a provisioning template for an
//! external engine to apply.
//!
//! # Ordering
//!
//! Resources and outputs keep their declaration order, both in memory and in
//! the serialized template, so two builds from the same configuration produce
//! byte-identical output.
//!
//! # Example
//!
//! ```rust
//! use zone_topology::graph::{Expr, LogicalId, Resource, ResourceGraph};
//! use serde_json::json;
//!
//! let mut graph = ResourceGraph::new("demo");
//! let zone_id = LogicalId::new("HostedZone").unwrap();
//! graph
//!     .add(zone_id.clone(), Resource::new("AWS::Route53::HostedZone", json!({ "Name": "example.com" })))
//!     .unwrap();
//!
//! assert_eq!(graph.len(), 1);
//! assert_eq!(Expr::Ref(zone_id).to_json(), json!({ "Ref": "HostedZone" }));
//! ```

pub mod expr;

pub use expr::{Expr, Pseudo};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::{TopologyError, TopologyResult};

/// Logical identifier of a resource inside one graph
///
/// Alphanumeric only, starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(String);

impl LogicalId {
    /// Create a logical id, rejecting non-alphanumeric input
    pub fn new(id: impl Into<String>) -> TopologyResult<Self> {
        let id = id.into();
        let starts_with_letter = id.chars().next().map_or(false, |c| c.is_ascii_alphabetic());
        if !starts_with_letter || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TopologyError::InvalidLogicalId(id));
        }
        Ok(Self(id))
    }

    /// Derive an id from a prefix and a free-form name
    ///
    /// `("CloudFront", "www.example.com")` → `CloudFrontWwwExampleCom`
    ///
    /// Names that do not survive the PascalCase rendering unambiguously
    /// (hyphens, uppercase, labels starting with a digit) get the first
    /// eight hex digits of the SHA-256 of the raw name appended, so
    /// `my-site.com` and `my.site.com` never share an id.
    pub fn derive(prefix: &str, name: &str) -> TopologyResult<Self> {
        let mut id = String::from(prefix);
        for segment in name.split(|c: char| !c.is_ascii_alphanumeric()) {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                id.push(first.to_ascii_uppercase());
                id.extend(chars);
            }
        }
        if !renders_unambiguously(name) {
            let digest = Sha256::digest(name.as_bytes());
            id.push_str(&hex::encode(&digest[..4]));
        }
        Self::new(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dot-separated lowercase labels, each starting with a letter
fn renders_unambiguously(name: &str) -> bool {
    name.split('.').all(|label| {
        let mut chars = label.chars();
        chars.next().map_or(false, |c| c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One declared resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Provider resource type, e.g. `AWS::CloudFront::Distribution`
    pub resource_type: String,
    /// Synthesized properties
    pub properties: Value,
    /// Explicit ordering edges in addition to those implied by references
    pub depends_on: Vec<LogicalId>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
        }
    }

    /// Add an explicit dependency edge
    pub fn depends_on(mut self, id: &LogicalId) -> Self {
        if !self.depends_on.contains(id) {
            self.depends_on.push(id.clone());
        }
        self
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = if self.depends_on.is_empty() { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(entries))?;
        map.serialize_entry("Type", &self.resource_type)?;
        map.serialize_entry("Properties", &self.properties)?;
        if !self.depends_on.is_empty() {
            let ids: Vec<&str> = self.depends_on.iter().map(LogicalId::as_str).collect();
            map.serialize_entry("DependsOn", &ids)?;
        }
        map.end()
    }
}

/// Exported value of the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub value: Expr,
    pub description: Option<String>,
    pub export_name: Option<String>,
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Value", &self.value)?;
        if let Some(description) = &self.description {
            map.serialize_entry("Description", description)?;
        }
        if let Some(name) = &self.export_name {
            map.serialize_entry("Export", &serde_json::json!({ "Name": name }))?;
        }
        map.end()
    }
}

/// Ordered graph of declared resources and outputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    description: String,
    resources: Vec<(LogicalId, Resource)>,
    outputs: Vec<(String, Output)>,
}

impl ResourceGraph {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            resources: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Declare a resource; fails if the id is already taken
    pub fn add(&mut self, id: LogicalId, resource: Resource) -> TopologyResult<LogicalId> {
        if self.contains(&id) {
            return Err(TopologyError::DuplicateLogicalId(id.to_string()));
        }
        self.resources.push((id.clone(), resource));
        Ok(id)
    }

    pub fn contains(&self, id: &LogicalId) -> bool {
        self.resources.iter().any(|(existing, _)| existing == id)
    }

    pub fn get(&self, id: &LogicalId) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, resource)| resource)
    }

    pub fn get_mut(&mut self, id: &LogicalId) -> Option<&mut Resource> {
        self.resources
            .iter_mut()
            .find(|(existing, _)| existing == id)
            .map(|(_, resource)| resource)
    }

    /// Resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = (&LogicalId, &Resource)> {
        self.resources.iter().map(|(id, resource)| (id, resource))
    }

    /// Resources of one type in declaration order
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a LogicalId, &'a Resource)> + 'a {
        self.resources()
            .filter(move |(_, resource)| resource.resource_type == resource_type)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Add or replace a named output
    pub fn add_output(&mut self, name: impl Into<String>, output: Output) {
        let name = name.into();
        match self.outputs.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = output,
            None => self.outputs.push((name, output)),
        }
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, output)| output)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(name, output)| (name.as_str(), output))
    }

    /// Pretty-printed template JSON
    pub fn to_json_pretty(&self) -> TopologyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Template as a JSON value
    pub fn to_value(&self) -> TopologyResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

struct OrderedEntries<'a, T>(&'a [(LogicalId, T)]);

impl<T: Serialize> Serialize for OrderedEntries<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, value) in self.0 {
            map.serialize_entry(id.as_str(), value)?;
        }
        map.end()
    }
}

struct NamedEntries<'a, T>(&'a [(String, T)]);

impl<T: Serialize> Serialize for NamedEntries<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for ResourceGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("AWSTemplateFormatVersion", "2010-09-09")?;
        map.serialize_entry("Description", &self.description)?;
        map.serialize_entry("Resources", &OrderedEntries(&self.resources))?;
        if !self.outputs.is_empty() {
            map.serialize_entry("Outputs", &NamedEntries(&self.outputs))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derive_logical_id() {
        let id = LogicalId::derive("CloudFront", "www.example.com").unwrap();
        assert_eq!(id.as_str(), "CloudFrontWwwExampleCom");
        assert!(LogicalId::new("9lives").is_err());
        assert!(LogicalId::new("has-dash").is_err());
    }

    #[test]
    fn test_derive_separates_hyphen_and_dot_twins() {
        let hyphen = LogicalId::derive("CloudFront", "my-site.com").unwrap();
        let dotted = LogicalId::derive("CloudFront", "my.site.com").unwrap();
        assert_ne!(hyphen, dotted);
        assert_eq!(dotted.as_str(), "CloudFrontMySiteCom");
        assert!(hyphen.as_str().starts_with("CloudFrontMySiteCom"));
        assert_eq!(hyphen.as_str().len(), "CloudFrontMySiteCom".len() + 8);

        let digits = LogicalId::derive("Cname", "a1.2.example.com").unwrap();
        assert_ne!(digits, LogicalId::derive("Cname", "a12.example.com").unwrap());
    }

    #[test]
    fn test_derive_is_stable() {
        let first = LogicalId::derive("Cname", "a-b.example.com").unwrap();
        let second = LogicalId::derive("Cname", "a-b.example.com").unwrap();
        assert_eq!(first, second);
        assert_ne!(first, LogicalId::derive("Cname", "a.b.example.com").unwrap());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut graph = ResourceGraph::new("test");
        let id = LogicalId::new("Zone").unwrap();
        graph
            .add(id.clone(), Resource::new("AWS::Route53::HostedZone", json!({})))
            .unwrap();
        let err = graph
            .add(id, Resource::new("AWS::Route53::HostedZone", json!({})))
            .unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateLogicalId(ref id) if id == "Zone"));
    }

    #[test]
    fn test_serialization_keeps_declaration_order() {
        let mut graph = ResourceGraph::new("ordered");
        for name in ["Zeta", "Alpha", "Mid"] {
            graph
                .add(LogicalId::new(name).unwrap(), Resource::new("Test::Thing", json!({})))
                .unwrap();
        }
        let text = graph.to_json_pretty().unwrap();
        let zeta = text.find("\"Zeta\"").unwrap();
        let alpha = text.find("\"Alpha\"").unwrap();
        let mid = text.find("\"Mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_depends_on_and_outputs() {
        let mut graph = ResourceGraph::new("outputs");
        let a = LogicalId::new("A").unwrap();
        let b = LogicalId::new("B").unwrap();
        graph.add(a.clone(), Resource::new("T", json!({}))).unwrap();
        graph
            .add(b.clone(), Resource::new("T", json!({})).depends_on(&a).depends_on(&a))
            .unwrap();
        graph.add_output(
            "Thing",
            Output {
                value: Expr::Ref(b.clone()),
                description: Some("the thing".to_string()),
                export_name: None,
            },
        );

        let value = graph.to_value().unwrap();
        assert_eq!(value["Resources"]["B"]["DependsOn"], json!(["A"]));
        assert!(value["Resources"]["A"].get("DependsOn").is_none());
        assert_eq!(value["Outputs"]["Thing"]["Value"], json!({ "Ref": "B" }));
        assert_eq!(graph.resources_of_type("T").count(), 2);
    }
}
