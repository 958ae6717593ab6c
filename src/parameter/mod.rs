// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cross-Region Parameter Resolution
//!
//! Parameters live in a regional store. When a stack needs a value published
//! in another region it cannot read it while the graph is built; instead it
//! declares a bridge invocation (a small query function and its execution
//! role) that reads the parameter during apply, and refers to the result
//! attribute of that invocation.
//!
//! ```text
//! Resolver.resolve(name, region)
//!   ├─ CrossRegionParameterReaderRole      (once per graph)
//!   ├─ CrossRegionParameterReaderFunction  (once per graph)
//!   └─ Custom::CrossRegionParameter        (once per (name, region))
//!        └─ GetAtt Value  ← the deferred reference handed back
//! ```
//!
//! The handle starts [`ParameterState::Pending`]. Only a [`ParameterStore`]
//! (the engine's read at apply time) can move it to
//! [`ParameterState::Resolved`].

pub mod store;

pub use store::{InMemoryParameterStore, ParameterStore};

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::Region;
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{Expr, LogicalId, Pseudo, Resource, ResourceGraph};

/// Resource type of the per-parameter bridge invocation
pub const CROSS_REGION_PARAMETER_TYPE: &str = "Custom::CrossRegionParameter";

/// Attribute of the bridge invocation carrying the parameter value
pub const VALUE_ATTRIBUTE: &str = "Value";

const READER_ROLE_ID: &str = "CrossRegionParameterReaderRole";
const READER_FUNCTION_ID: &str = "CrossRegionParameterReaderFunction";
const READER_RUNTIME: &str = "python3.12";
const GRANTED_RESOURCES: &str = "/Policies/0/PolicyDocument/Statement/0/Resource";

const READER_SOURCE: &str = r#"import boto3
import cfnresponse


def handler(event, context):
    props = event["ResourceProperties"]
    physical_id = "{}:{}".format(props["Region"], props["ParameterName"])
    if event["RequestType"] == "Delete":
        cfnresponse.send(event, context, cfnresponse.SUCCESS, {}, physical_id)
        return
    try:
        ssm = boto3.client("ssm", region_name=props["Region"])
        value = ssm.get_parameter(Name=props["ParameterName"])["Parameter"]["Value"]
        cfnresponse.send(event, context, cfnresponse.SUCCESS, {"Value": value}, physical_id)
    except Exception as error:
        cfnresponse.send(event, context, cfnresponse.FAILED, {}, physical_id, reason=str(error))
"#;

/// State of a deferred parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterState {
    /// Declared; value only known once the graph is applied
    Pending,
    /// Value read from the parameter store
    Resolved(String),
}

/// Handle to a parameter read in another region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossRegionParameter {
    pub parameter_name: String,
    pub region: Region,
    reader: LogicalId,
    state: ParameterState,
}

impl CrossRegionParameter {
    /// Deferred reference to the value, usable anywhere in the graph
    pub fn reference(&self) -> Expr {
        Expr::get_att(&self.reader, VALUE_ATTRIBUTE)
    }

    /// Logical id of the bridge invocation
    pub fn reader_id(&self) -> &LogicalId {
        &self.reader
    }

    pub fn state(&self) -> &ParameterState {
        &self.state
    }

    /// The value, once resolved
    pub fn value(&self) -> Option<&str> {
        match &self.state {
            ParameterState::Pending => None,
            ParameterState::Resolved(value) => Some(value),
        }
    }

    /// Read the value from `store`, as the engine does during apply
    ///
    /// Already resolved handles are returned unchanged.
    pub fn resolve_with(self, store: &dyn ParameterStore) -> TopologyResult<Self> {
        match self.state {
            ParameterState::Resolved(_) => Ok(self),
            ParameterState::Pending => {
                let value = store.get_parameter(&self.parameter_name, &self.region)?;
                Ok(Self {
                    state: ParameterState::Resolved(value),
                    ..self
                })
            }
        }
    }
}

/// Declares bridge invocations for parameters held in other regions
#[derive(Debug, Clone)]
pub struct CrossRegionParameterResolver {
    stack_region: Region,
    account: Expr,
    readers: Vec<(String, Region, LogicalId)>,
}

impl CrossRegionParameterResolver {
    /// Resolver for a stack deployed to `stack_region`
    pub fn new(stack_region: Region) -> Self {
        Self {
            stack_region,
            account: Expr::Pseudo(Pseudo::AccountId),
            readers: Vec::new(),
        }
    }

    /// Account owning the bridged parameters; the deploying account by default
    pub fn with_account(mut self, account: Expr) -> Self {
        self.account = account;
        self
    }

    /// Declare (or reuse) the bridge reading `parameter_name` in `region`
    ///
    /// Identical inputs reuse the same invocation, so every handle for one
    /// `(name, region)` refers to the same value.
    pub fn resolve(
        &mut self,
        graph: &mut ResourceGraph,
        parameter_name: &str,
        region: &Region,
    ) -> TopologyResult<CrossRegionParameter> {
        if let Some((_, _, reader)) = self
            .readers
            .iter()
            .find(|(name, r, _)| name == parameter_name && r == region)
        {
            debug!(parameter = parameter_name, region = %region, "Reusing cross-region reader");
            return Ok(self.handle(parameter_name, region, reader.clone()));
        }

        if region == &self.stack_region {
            warn!(
                parameter = parameter_name,
                region = %region,
                "Parameter is in the stack's own region; bridging anyway"
            );
        }

        let function = self.declare_reader(graph)?;
        let reader = LogicalId::derive(
            "CrossRegionParameter",
            &format!("{} {}", region, parameter_name),
        )?;

        graph.add(
            reader.clone(),
            Resource::new(
                CROSS_REGION_PARAMETER_TYPE,
                json!({
                    "ServiceToken": Expr::get_att(&function, "Arn"),
                    "ParameterName": parameter_name,
                    "Region": region.as_str(),
                }),
            ),
        )?;
        self.allow_read(graph, parameter_name, region)?;

        debug!(parameter = parameter_name, region = %region, reader = %reader, "Declared cross-region reader");
        self.readers
            .push((parameter_name.to_string(), region.clone(), reader.clone()));
        Ok(self.handle(parameter_name, region, reader))
    }

    /// Number of distinct parameters bridged so far
    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    fn handle(&self, parameter_name: &str, region: &Region, reader: LogicalId) -> CrossRegionParameter {
        CrossRegionParameter {
            parameter_name: parameter_name.to_string(),
            region: region.clone(),
            reader,
            state: ParameterState::Pending,
        }
    }

    /// Role and function, declared on first use
    fn declare_reader(&self, graph: &mut ResourceGraph) -> TopologyResult<LogicalId> {
        let role = LogicalId::new(READER_ROLE_ID)?;
        let function = LogicalId::new(READER_FUNCTION_ID)?;
        if graph.contains(&function) {
            return Ok(function);
        }

        graph.add(
            role.clone(),
            Resource::new(
                "AWS::IAM::Role",
                json!({
                    "AssumeRolePolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Principal": { "Service": "lambda.amazonaws.com" },
                            "Action": "sts:AssumeRole",
                        }],
                    },
                    "ManagedPolicyArns": [Expr::join("", vec![
                        "arn:".into(),
                        Expr::Pseudo(Pseudo::Partition),
                        ":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole".into(),
                    ])],
                    "Policies": [{
                        "PolicyName": "ReadParameters",
                        "PolicyDocument": {
                            "Version": "2012-10-17",
                            "Statement": [{
                                "Effect": "Allow",
                                "Action": "ssm:GetParameter",
                                "Resource": [],
                            }],
                        },
                    }],
                }),
            ),
        )?;

        graph.add(
            function.clone(),
            Resource::new(
                "AWS::Lambda::Function",
                json!({
                    "Runtime": READER_RUNTIME,
                    "Handler": "index.handler",
                    "Timeout": 30,
                    "Role": Expr::get_att(&role, "Arn"),
                    "Code": { "ZipFile": READER_SOURCE },
                }),
            ),
        )?;

        Ok(function)
    }

    /// Grant the role read access to one more parameter
    fn allow_read(&self, graph: &mut ResourceGraph, parameter_name: &str, region: &Region) -> TopologyResult<()> {
        let role = LogicalId::new(READER_ROLE_ID)?;
        let path = parameter_name.trim_start_matches('/');
        let arn = Expr::join("", vec![
            "arn:".into(),
            Expr::Pseudo(Pseudo::Partition),
            format!(":ssm:{}:", region).into(),
            self.account.clone(),
            format!(":parameter/{}", path).into(),
        ]);

        let granted = graph
            .get_mut(&role)
            .and_then(|resource| resource.properties.pointer_mut(GRANTED_RESOURCES))
            .and_then(|value| value.as_array_mut())
            .ok_or_else(|| TopologyError::MissingPropertyPath {
                resource: role.to_string(),
                path: GRANTED_RESOURCES.to_string(),
            })?;
        granted.push(arn.to_json());
        Ok(())
    }
}
