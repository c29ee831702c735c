//! Startup chain selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::network::Network;

/// Chain selection read once at process start.
///
/// This is the only configuration the codec layer owns: which coin and
/// network the process indexes. Everything else about a chain comes from
/// the registry entry the selection resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoinSelection {
    /// Coin name, e.g. "Bitcoin" or "Dash". Matched case-insensitively.
    pub coin: String,
    /// Network tag.
    pub network: Network,
}

impl Default for CoinSelection {
    fn default() -> Self {
        CoinSelection {
            coin: "Bitcoin".to_string(),
            network: Network::Mainnet,
        }
    }
}

impl CoinSelection {
    /// Loads a selection from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let selection: CoinSelection = toml::from_str(&text)?;
        info!(
            coin = %selection.coin,
            network = %selection.network,
            "loaded chain selection"
        );
        Ok(selection)
    }
}

/// Errors raised while loading the chain selection.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Selection file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Selection file is not valid TOML for a [`CoinSelection`].
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
