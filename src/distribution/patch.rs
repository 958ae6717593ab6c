// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed post-construction patches
//!
//! The distribution configuration has no field for an origin's access
//! control. It is written after synthesis, at a typed path into the
//! resource's properties, so a missing path is an error instead of a silent
//! no-op.

use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{LogicalId, Resource};

const ORIGINS_POINTER: &str = "/DistributionConfig/Origins";

/// Field of a synthesized origin that can be patched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginBindingField {
    AccessControlId,
}

impl OriginBindingField {
    /// Property name inside the origin
    pub fn property(&self) -> &'static str {
        match self {
            OriginBindingField::AccessControlId => "OriginAccessControlId",
        }
    }
}

/// Typed path to one field of one origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginBinding {
    pub index: usize,
    pub field: OriginBindingField,
}

impl OriginBinding {
    /// The access-control id of the first (and only) origin
    pub const ACCESS_CONTROL: OriginBinding = OriginBinding {
        index: 0,
        field: OriginBindingField::AccessControlId,
    };

    /// Write `value` at this path in `resource`
    ///
    /// Only origin 0 of a single-origin distribution can be patched.
    pub fn apply(&self, id: &LogicalId, resource: &mut Resource, value: Value) -> TopologyResult<()> {
        if self.index != 0 {
            return Err(TopologyError::MultiOriginUnsupported { index: self.index });
        }

        let fail = |reason: &str| TopologyError::OriginBindingPatch {
            resource: id.to_string(),
            path: self.to_string(),
            reason: reason.to_string(),
        };

        let origins = resource
            .properties
            .pointer_mut(ORIGINS_POINTER)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| fail("resource has no origin list"))?;
        if origins.len() > 1 {
            return Err(TopologyError::MultiOriginUnsupported {
                index: origins.len() - 1,
            });
        }

        let origin = origins
            .get_mut(self.index)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| fail("origin is missing"))?;
        origin.insert(self.field.property().to_string(), value);

        debug!(resource = %id, path = %self, "Applied origin binding patch");
        Ok(())
    }
}

impl fmt::Display for OriginBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DistributionConfig.Origins.{}.{}",
            self.index,
            self.field.property()
        )
    }
}
