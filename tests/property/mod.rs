// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `topology_determinism`: whole-stack builds from generated documents
//! - `parameter_resolution`: cross-region reads are idempotent

mod parameter_resolution;
mod topology_determinism;
