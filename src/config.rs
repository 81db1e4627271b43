//! Network configuration.
//!
//! `NetworkConfig` tunes allocation behavior of a [`Network`](crate::Network).
//! It is plain serde data, so hosts can keep it next to their own settings
//! and load it from JSON.
//!
//! # Example
//!
//! ```
//! use moorenet::{Network, NetworkConfig};
//!
//! let config = NetworkConfig::from_json(r#"{ "max_fanout": 16 }"#).unwrap();
//! assert_eq!(config.destination_capacity, 2);
//!
//! let net = Network::with_config(config).unwrap();
//! assert!(net.is_empty());
//! ```

use crate::error::{MooreError, Result};
use serde::{Deserialize, Serialize};

/// Initial size of a destination list on its first allocation.
pub const DEFAULT_DESTINATION_CAPACITY: usize = 2;

/// Largest `automata_capacity` accepted. Arena slots are indexed by `u32`.
pub const MAX_AUTOMATA_CAPACITY: usize = (u32::MAX - 1) as usize;

/// Allocation settings for a [`Network`](crate::Network).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of automata the arena reserves room for up front. At most
    /// [`MAX_AUTOMATA_CAPACITY`].
    pub automata_capacity: usize,

    /// Entries allocated the first time an output bit gains a destination.
    /// Lists double when full. Must be non-zero.
    pub destination_capacity: usize,

    /// Upper bound on the inputs a single output bit may drive.
    ///
    /// A `connect` that would exceed it fails with `OutOfMemory`, the same
    /// outcome as a failed destination-list growth.
    pub max_fanout: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            automata_capacity: 0,
            destination_capacity: DEFAULT_DESTINATION_CAPACITY,
            max_fanout: None,
        }
    }
}

impl NetworkConfig {
    /// Check the settings for values the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.destination_capacity == 0 {
            return Err(MooreError::invalid("destination_capacity must be non-zero"));
        }
        if self.automata_capacity > MAX_AUTOMATA_CAPACITY {
            return Err(MooreError::invalid(format!(
                "automata_capacity {} exceeds maximum {}",
                self.automata_capacity, MAX_AUTOMATA_CAPACITY
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            MooreError::invalid(format!("Failed to parse network config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Export the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            MooreError::invalid(format!("Failed to serialize network config: {}", e))
        })
    }
}
