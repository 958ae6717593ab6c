// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone topology builder
//!
//! Compiles a web-zone configuration document into a declarative resource
//! graph: one shared certificate, one CDN distribution per zone in front of
//! its storage bucket, and the DNS records pointing each zone at its
//! distribution. The graph is handed to an external provisioning engine;
//! nothing here talks to a provider.

pub mod certificate;
pub mod config;
pub mod distribution;
pub mod dns;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod parameter;
pub mod topology;

// Re-export commonly used types
pub use config::{ConfigStore, InfraDocument, StackConfig};
pub use errors::{TopologyError, TopologyResult};
pub use graph::{Expr, LogicalId, ResourceGraph};
pub use topology::{build_topology, TopologyBuilder, TopologyStack, ZoneTopology};
