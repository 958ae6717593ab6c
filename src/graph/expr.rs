// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deferred value expressions
//!
//! Values in the resource graph are either literals known at construction
//! time or references the provisioning engine resolves while applying.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use super::LogicalId;

/// Pseudo parameters supplied by the provisioning engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pseudo {
    AccountId,
    Partition,
}

impl Pseudo {
    fn name(&self) -> &'static str {
        match self {
            Pseudo::AccountId => "AWS::AccountId",
            Pseudo::Partition => "AWS::Partition",
        }
    }
}

/// A value in the resource graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Known at construction time
    Literal(String),
    /// Primary identifier of another resource
    Ref(LogicalId),
    /// Named attribute of another resource
    GetAtt { resource: LogicalId, attribute: String },
    /// Engine-supplied value
    Pseudo(Pseudo),
    /// Concatenation resolved at apply time
    Join { delimiter: String, parts: Vec<Expr> },
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn get_att(resource: &LogicalId, attribute: impl Into<String>) -> Self {
        Expr::GetAtt {
            resource: resource.clone(),
            attribute: attribute.into(),
        }
    }

    pub fn join(delimiter: impl Into<String>, parts: Vec<Expr>) -> Self {
        Expr::Join {
            delimiter: delimiter.into(),
            parts,
        }
    }

    /// The literal value, if this expression is known at construction time
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Expr::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the value is only known once the graph is applied
    pub fn is_deferred(&self) -> bool {
        match self {
            Expr::Literal(_) => false,
            Expr::Join { parts, .. } => parts.iter().any(Expr::is_deferred),
            _ => true,
        }
    }

    /// Template JSON form of the expression
    pub fn to_json(&self) -> Value {
        match self {
            Expr::Literal(value) => Value::String(value.clone()),
            Expr::Ref(id) => json!({ "Ref": id.as_str() }),
            Expr::GetAtt { resource, attribute } => {
                json!({ "Fn::GetAtt": [resource.as_str(), attribute] })
            }
            Expr::Pseudo(pseudo) => json!({ "Ref": pseudo.name() }),
            Expr::Join { delimiter, parts } => {
                let parts: Vec<Value> = parts.iter().map(Expr::to_json).collect();
                json!({ "Fn::Join": [delimiter, parts] })
            }
        }
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Literal(value)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
