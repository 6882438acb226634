use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// The networks the client knows default endpoints for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    #[serde(alias = "public")]
    Mainnet,
}

#[derive(Debug, Clone, Error)]
#[error("unknown network: {0}")]
pub struct ParseNetworkError(pub String);

impl Network {
    /// The passphrase that is mixed into every transaction hash on this network
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Mainnet => MAINNET_PASSPHRASE,
        }
    }

    pub fn horizon_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://horizon-testnet.stellar.org",
            Network::Mainnet => "https://horizon.stellar.org",
        }
    }

    pub fn soroban_rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://soroban-testnet.stellar.org",
            Network::Mainnet => "https://soroban-rpc.stellar.org",
        }
    }

    /// Only the test network has a funding service
    pub fn friendbot_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some("https://friendbot.stellar.org"),
            Network::Mainnet => None,
        }
    }

    /// Resolves a network from its passphrase
    pub fn from_passphrase(passphrase: &str) -> Option<Self> {
        match passphrase {
            TESTNET_PASSPHRASE => Some(Network::Testnet),
            MAINNET_PASSPHRASE => Some(Network::Mainnet),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => f.write_str("testnet"),
            Network::Mainnet => f.write_str("mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ParseNetworkError;

    /// Case-insensitive; wallets report the main network as `PUBLIC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" | "test" => Ok(Network::Testnet),
            "mainnet" | "public" => Ok(Network::Mainnet),
            _ => Err(ParseNetworkError(s.to_owned())),
        }
    }
}
