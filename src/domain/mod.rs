// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone Domain Models
//!
//! Value objects with validation invariants for everything the topology
//! builder reads from configuration.
//!
//! # Value Objects with Invariants
//!
//! - [`DomainName`] - DNS-validated fully-qualified names (RFC 1123)
//! - [`AliasLabel`] - names relative to a zone apex
//! - [`CertificateName`] - certificate names, optionally single-level wildcards
//! - [`Region`] - provider region identifiers
//!
//! # Entities
//!
//! - [`ZoneSpec`] - one zone and its aliases, immutable after parsing
//! - [`CertificateRequirement`] - the shared certificate and its validation zones

pub mod domain_name;
pub mod region;
pub mod zone;

pub use domain_name::{AliasLabel, DomainName, DomainNameError};
pub use region::{Region, RegionError};
pub use zone::{CertificateName, CertificateRequirement, ZoneSpec};
