//! Network tag for Ferrite configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Network tag for Ferrite configuration.
///
/// A chain is identified by its coin name plus one of these tags; the codec
/// registry is keyed on the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet network
    Mainnet,
    /// Testnet network
    Testnet,
    /// Regtest network (for local testing)
    Regtest,
}

impl Network {
    /// Lowercase name as it appears in config files and registry lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a network string matches no known tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network {0:?}, valid options are 'mainnet', 'testnet' or 'regtest'")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

#[cfg(test)]
mod network_tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("TESTNET".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("regtest".parse::<Network>().unwrap(), Network::Regtest);
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "simnet".parse::<Network>().unwrap_err();
        assert_eq!(err, UnknownNetwork("simnet".to_string()));
    }

    #[test]
    fn display_matches_as_str() {
        for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
            assert_eq!(network.to_string(), network.as_str());
        }
    }
}
