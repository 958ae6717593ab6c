// Copyright (c) 2025 - Cowboy AI, Inc.
//! Parameter store primitive
//!
//! The topology builder never reads parameters itself; the provisioning
//! engine does, through the bridge function. This trait models that read
//! so apply-time resolution can be exercised without a provider.

use std::collections::BTreeMap;

use crate::domain::Region;
use crate::errors::{TopologyError, TopologyResult};

/// Regional key/value parameter store
pub trait ParameterStore {
    /// Read a parameter's current value in `region`
    fn get_parameter(&self, name: &str, region: &Region) -> TopologyResult<String>;

    /// Publish a value under `name` in `region`, replacing any previous one
    fn put_parameter(&mut self, name: &str, region: &Region, value: String);
}

/// Parameter store held in memory, keyed by region then name
#[derive(Debug, Clone, Default)]
pub struct InMemoryParameterStore {
    values: BTreeMap<(Region, String), String>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style publish
    pub fn with_parameter(mut self, name: &str, region: &Region, value: impl Into<String>) -> Self {
        self.put_parameter(name, region, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get_parameter(&self, name: &str, region: &Region) -> TopologyResult<String> {
        self.values
            .get(&(region.clone(), name.to_string()))
            .cloned()
            .ok_or_else(|| TopologyError::ParameterNotFound {
                name: name.to_string(),
                region: region.to_string(),
            })
    }

    fn put_parameter(&mut self, name: &str, region: &Region, value: String) {
        self.values.insert((region.clone(), name.to_string()), value);
    }
}
