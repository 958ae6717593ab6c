// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology construction
//!
//! Every error here is raised while the resource graph is being built, with
//! one exception: [`TopologyError::ParameterNotFound`] only happens when a
//! deferred cross-region reference is resolved at apply time.

use thiserror::Error;

use crate::domain::DomainNameError;

/// Errors that can occur while building a zone topology
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Configuration file missing or not parseable
    #[error("Failed to load configuration from {path}: {reason}")]
    ConfigLoad { path: String, reason: String },

    /// Required key absent or with the wrong shape
    #[error("Configuration key '{key}' has an invalid shape: {reason}")]
    ConfigShape { key: String, reason: String },

    /// Domain name or alias label failed validation
    #[error("Invalid domain: {0}")]
    InvalidDomain(#[from] DomainNameError),

    /// Parameter does not exist in the target region (apply time only)
    #[error("Parameter '{name}' not found in region {region}")]
    ParameterNotFound { name: String, region: String },

    /// Aliases were requested for a distribution without a certificate
    #[error("Distribution for {zone} declares aliases {aliases:?} but no certificate is bound")]
    AliasWithoutCertificate { zone: String, aliases: Vec<String> },

    /// An alias is not covered by the bound certificate's names
    #[error("Alias '{alias}' is not covered by certificate names {covered:?}")]
    AliasNotCovered { alias: String, covered: Vec<String> },

    /// Only single-origin distributions are supported
    #[error("Origin binding at index {index} is unsupported; only origin 0 can be patched")]
    MultiOriginUnsupported { index: usize },

    /// The synthesized resource lacks the property path being patched
    #[error("Cannot patch {path} on {resource}: {reason}")]
    OriginBindingPatch {
        resource: String,
        path: String,
        reason: String,
    },

    /// A declared resource lacks a property path the builder appends to
    #[error("Resource {resource} has no array at {path}")]
    MissingPropertyPath { resource: String, path: String },

    /// A certificate was bound to a distribution serving no aliases
    #[error("Distribution for {zone} binds a certificate but declares no aliases")]
    CertificateWithoutAliases { zone: String },

    /// Logical id is not alphanumeric or does not start with a letter
    #[error("Invalid logical id: '{0}'")]
    InvalidLogicalId(String),

    /// Two resources were declared with the same logical id
    #[error("Duplicate logical id in resource graph: {0}")]
    DuplicateLogicalId(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for TopologyError {
    fn from(err: serde_yaml::Error) -> Self {
        TopologyError::Serialization(err.to_string())
    }
}

impl TopologyError {
    /// Shape error for a top-level configuration key
    pub fn shape(key: impl Into<String>, reason: impl ToString) -> Self {
        TopologyError::ConfigShape {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error can only surface when the graph is applied
    pub fn is_apply_time(&self) -> bool {
        matches!(self, TopologyError::ParameterNotFound { .. })
    }
}
