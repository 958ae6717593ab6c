// Copyright (c) 2025 - Cowboy AI, Inc.
//! Storage origin and the shared origin access control

use serde_json::json;
use tracing::debug;

use crate::domain::Region;
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{Expr, LogicalId, Pseudo, Resource, ResourceGraph};

pub const ORIGIN_ACCESS_CONTROL_TYPE: &str = "AWS::CloudFront::OriginAccessControl";
pub const BUCKET_POLICY_TYPE: &str = "AWS::S3::BucketPolicy";

const POLICY_STATEMENTS: &str = "/PolicyDocument/Statement";

const ORIGIN_ACCESS_CONTROL_ID: &str = "CloudFrontOriginAccessControl";

/// Existing storage bucket, looked up by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageOrigin {
    bucket_name: String,
    region: Region,
}

impl StorageOrigin {
    /// Reference a bucket by name in `region`
    pub fn from_bucket_name(bucket_name: impl Into<String>, region: Region) -> TopologyResult<Self> {
        let bucket_name = bucket_name.into();
        if bucket_name.trim().is_empty() {
            return Err(TopologyError::shape("bucket", "must not be empty"));
        }
        Ok(Self {
            bucket_name,
            region,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// `arn:aws:s3:::<bucket>`
    pub fn arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.bucket_name)
    }

    /// `<bucket>.s3.<region>.amazonaws.com`
    pub fn regional_domain_name(&self) -> String {
        format!("{}.s3.{}.amazonaws.com", self.bucket_name, self.region)
    }

    /// Let `distribution` read the bucket through its access control
    ///
    /// Declares the bucket policy on first use; distributions sharing a bucket
    /// each add one statement scoped to their own ARN.
    pub fn grant_read(
        &self,
        graph: &mut ResourceGraph,
        distribution: &LogicalId,
        account: &Expr,
    ) -> TopologyResult<LogicalId> {
        let policy = LogicalId::derive("BucketPolicy", &self.bucket_name)?;
        if !graph.contains(&policy) {
            graph.add(
                policy.clone(),
                Resource::new(
                    BUCKET_POLICY_TYPE,
                    json!({
                        "Bucket": self.bucket_name,
                        "PolicyDocument": { "Version": "2012-10-17", "Statement": [] },
                    }),
                ),
            )?;
        }

        let source_arn = Expr::join("", vec![
            "arn:".into(),
            Expr::Pseudo(Pseudo::Partition),
            ":cloudfront::".into(),
            account.clone(),
            ":distribution/".into(),
            Expr::Ref(distribution.clone()),
        ]);
        let statement = json!({
            "Sid": format!("AllowRead{}", distribution),
            "Effect": "Allow",
            "Principal": { "Service": "cloudfront.amazonaws.com" },
            "Action": ["s3:GetObject", "s3:List*"],
            "Resource": [format!("{}/*", self.arn()), self.arn()],
            "Condition": { "StringEquals": { "AWS:SourceArn": source_arn } },
        });

        graph
            .get_mut(&policy)
            .and_then(|resource| resource.properties.pointer_mut(POLICY_STATEMENTS))
            .and_then(|value| value.as_array_mut())
            .ok_or_else(|| TopologyError::MissingPropertyPath {
                resource: policy.to_string(),
                path: POLICY_STATEMENTS.to_string(),
            })?
            .push(statement);

        debug!(bucket = %self.bucket_name, distribution = %distribution, "Granted origin read");
        Ok(policy)
    }
}

/// Origin access control shared by every distribution in the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginAccessControl {
    id: LogicalId,
}

impl OriginAccessControl {
    /// Declare the access control, or return the one already in `graph`
    pub fn declare(graph: &mut ResourceGraph) -> TopologyResult<Self> {
        let id = LogicalId::new(ORIGIN_ACCESS_CONTROL_ID)?;
        if graph.contains(&id) {
            return Ok(Self { id });
        }

        graph.add(
            id.clone(),
            Resource::new(
                ORIGIN_ACCESS_CONTROL_TYPE,
                json!({
                    "OriginAccessControlConfig": {
                        "Name": "OAC",
                        "OriginAccessControlOriginType": "s3",
                        "SigningBehavior": "always",
                        "SigningProtocol": "sigv4",
                    }
                }),
            ),
        )?;
        debug!(id = %id, "Declared origin access control");
        Ok(Self { id })
    }

    pub fn logical_id(&self) -> &LogicalId {
        &self.id
    }

    /// Deferred access-control id
    pub fn access_control_id(&self) -> Expr {
        Expr::get_att(&self.id, "Id")
    }
}
