// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone Topology Synthesizer
//!
//! Loads the zone configuration document, builds the stack and prints the
//! provisioning template on stdout.
//!
//! Run with: cargo run --bin zone-topology-synth
//!
//! Environment:
//! - `TOPOLOGY_CONFIG`: configuration document (default `config/infra.yml`)
//! - `STACK_NAME`, `STACK_REGION`, `CERTIFICATE_REGION`, `AWS_ACCOUNT_ID`,
//!   `PRICE_CLASS`: see [`StackConfig::from_env`]

use anyhow::{Context, Result};
use tracing::info;
use zone_topology::{ConfigStore, StackConfig, TopologyBuilder};

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a clean template
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config_path =
        std::env::var("TOPOLOGY_CONFIG").unwrap_or_else(|_| "config/infra.yml".to_string());
    let stack = StackConfig::from_env().context("Invalid stack environment")?;

    info!(config = %config_path, stack = %stack.stack_name, "Synthesizing zone topology");

    let store = ConfigStore::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path))?;
    let built = TopologyBuilder::new(&store, stack)
        .build()
        .context("Failed to build zone topology")?;

    println!("{}", built.to_json_pretty()?);

    info!(
        resources = built.graph.len(),
        zones = built.zones.len(),
        "✅ Template written"
    );
    Ok(())
}
