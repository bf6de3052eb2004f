//! TOML configuration for `slotringctl`.
//!
//! When no config file is provided, [`CliConfig::load`] falls back to the
//! built-in demo topology: five nodes on a 50-slot ring and fourteen
//! entities.

use std::path::Path;

use serde::Deserialize;
use slotring_placement::DEFAULT_TOTAL_RANGE;

/// Hosts of the built-in demo topology.
pub const DEMO_NODES: [(&str, &str); 5] = [
    ("S1", "10.131.20.20"),
    ("S2", "10.131.20.10"),
    ("S3", "10.131.20.40"),
    ("S4", "10.131.20.51"),
    ("S5", "10.131.10.25"),
];

/// Node the demo adds after removing one.
pub const DEMO_JOINER: (&str, &str) = ("S6", "10.10.12.11");

/// Number of entities in the demo data set.
pub const DEMO_ENTITIES: usize = 14;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring sizing.
    pub ring: RingSection,
    /// Nodes to place on the ring, in insertion order.
    pub nodes: Vec<NodeEntry>,
    /// Entities to load once all nodes are placed.
    pub entities: Vec<EntityEntry>,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[ring]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RingSection {
    /// Number of slots. Defaults to 50.
    pub total_range: Option<u32>,
    /// Per-node entity limit. Unbounded if omitted.
    pub capacity: Option<usize>,
}

/// One `[[nodes]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeEntry {
    /// Display name.
    pub name: String,
    /// Host string the slot is derived from.
    pub host: String,
}

/// One `[[entities]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityEntry {
    /// Entity key.
    pub key: String,
    /// Entity value.
    pub value: String,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use the demo topology if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::demo()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The built-in demo topology and data set.
    pub fn demo() -> Self {
        Self {
            nodes: DEMO_NODES
                .iter()
                .map(|(name, host)| NodeEntry {
                    name: name.to_string(),
                    host: host.to_string(),
                })
                .collect(),
            entities: (1..=DEMO_ENTITIES)
                .map(|i| EntityEntry {
                    key: i.to_string(),
                    value: format!("Value{i}"),
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Effective slot count (config value or 50).
    pub fn total_range(&self) -> u32 {
        self.ring.total_range.unwrap_or(DEFAULT_TOTAL_RANGE)
    }

    /// Effective per-node entity limit.
    pub fn capacity(&self) -> usize {
        self.ring.capacity.unwrap_or(usize::MAX)
    }
}
