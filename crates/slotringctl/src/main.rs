//! `slotringctl`: drive a SlotRing from the command line.
//!
//! Builds an in-memory ring from a TOML topology, loads entities through it
//! and prints where everything landed.
//!
//! # Usage
//!
//! ```text
//! slotringctl demo                      # the five-node walkthrough
//! slotringctl show -c ring.toml         # place configured nodes and entities
//! slotringctl assign 1 2 k1             # which node owns each key
//! slotringctl remove S4                 # ring after S4 leaves
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slotring_placement::{Node, Ring};
use slotring_store::MemoryStore;
use tracing::{debug, info};

use config::{CliConfig, DEMO_JOINER};

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "slotringctl",
    version,
    about = "Consistent hashing ring over a fixed slot space"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true, env = "SLOTRING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place nodes and entities, remove the fourth node, then add one more.
    Demo,

    /// Place the configured nodes and entities and print the ring.
    Show,

    /// Print the slot and owning node of each key.
    Assign {
        /// Entity keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Remove a configured node by name and print the resulting ring.
    Remove {
        /// Node name as it appears in the config.
        name: String,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::Demo => cmd_demo(&config),
        Commands::Show => cmd_show(&config),
        Commands::Assign { keys } => cmd_assign(&config, &keys),
        Commands::Remove { name } => cmd_remove(&config, &name),
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// -----------------------------------------------------------------------
// Ring construction
// -----------------------------------------------------------------------

/// Build the ring described by `config` and load its entities.
///
/// Returns the nodes alongside the ring so callers keep a handle on each
/// store, including stores of nodes that later leave.
fn build_ring(config: &CliConfig) -> Result<(Ring, Vec<Node>)> {
    let mut ring = Ring::new(config.total_range()).context("invalid ring size")?;
    let mut nodes = Vec::with_capacity(config.nodes.len());

    for entry in &config.nodes {
        let node = new_node(config, &entry.name, &entry.host);
        let slot = ring
            .add_node(node.clone())
            .with_context(|| format!("failed to add node {}", entry.name))?;
        debug!(name = %entry.name, host = %entry.host, %slot, "placed node");
        nodes.push(node);
    }

    for entity in &config.entities {
        ring.put(&entity.key, &entity.value)
            .with_context(|| format!("failed to store entity {}", entity.key))?;
    }

    info!(
        nodes = ring.node_count(),
        entities = config.entities.len(),
        total_range = ring.total_range(),
        "ring ready"
    );
    Ok((ring, nodes))
}

fn new_node(config: &CliConfig, name: &str, host: &str) -> Node {
    Node::new(name, host, Arc::new(MemoryStore::new(config.capacity())))
}

fn find_node<'a>(nodes: &'a [Node], name: &str) -> Result<&'a Node> {
    nodes
        .iter()
        .find(|n| n.name() == name)
        .with_context(|| format!("no node named {name} in config"))
}

// -----------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------

fn cmd_demo(config: &CliConfig) -> Result<()> {
    let (mut ring, nodes) = build_ring(config)?;
    print!("{ring}");

    println!("-----------");
    if let Some(leaving) = nodes.get(3) {
        let slot = ring
            .remove_node(leaving)
            .with_context(|| format!("failed to remove node {}", leaving.name()))?;
        info!(node = %leaving, %slot, "removed node");
    }
    print!("{ring}");

    println!("-----------");
    let (name, host) = DEMO_JOINER;
    let joiner = new_node(config, name, host);
    let slot = ring
        .add_node(joiner.clone())
        .with_context(|| format!("failed to add node {name}"))?;
    info!(node = %joiner, %slot, "added node");
    print!("{ring}");

    Ok(())
}

fn cmd_show(config: &CliConfig) -> Result<()> {
    let (ring, _nodes) = build_ring(config)?;
    print!("{ring}");
    Ok(())
}

fn cmd_assign(config: &CliConfig, keys: &[String]) -> Result<()> {
    let (ring, _nodes) = build_ring(config)?;
    for key in keys {
        let node = ring
            .assign(key)
            .with_context(|| format!("cannot assign {key}"))?;
        println!("{key} -> slot {} -> {node}", ring.slot_of(key));
    }
    Ok(())
}

fn cmd_remove(config: &CliConfig, name: &str) -> Result<()> {
    let (mut ring, nodes) = build_ring(config)?;
    let node = find_node(&nodes, name)?;
    let slot = ring
        .remove_node(node)
        .with_context(|| format!("failed to remove node {name}"))?;
    println!("Removed {node} from slot {slot}");
    print!("{ring}");
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
