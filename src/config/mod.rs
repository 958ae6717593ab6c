// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration
//!
//! - [`ConfigStore`]: the raw YAML document, loaded once
//! - [`InfraDocument`]: the validated zone/certificate view of that document
//! - [`StackConfig`]: where and how the stack is synthesized

pub mod document;
pub mod stack;
pub mod store;

pub use document::{AppCertificate, AwsSection, InfraDocument, ZoneEntry};
pub use stack::StackConfig;
pub use store::ConfigStore;
