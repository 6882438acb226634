use crate::types::{DeploymentRecord, Network, ParseNetworkError};
use std::env;
use thiserror::Error;
use url::Url;

pub const NETWORK_ENV: &str = "SENTE_NETWORK";
pub const HORIZON_URL_ENV: &str = "SENTE_HORIZON_URL";
pub const SOROBAN_RPC_URL_ENV: &str = "SENTE_SOROBAN_RPC_URL";
pub const FRIENDBOT_URL_ENV: &str = "SENTE_FRIENDBOT_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownNetwork(#[from] ParseNetworkError),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Resolved endpoints of the network the client talks to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    pub passphrase: String,
    pub horizon_url: Url,
    pub soroban_rpc_url: Url,
    pub friendbot_url: Option<Url>,
}

impl NetworkConfig {
    /// The default public endpoints of `network`
    pub fn new(network: Network) -> Result<Self, ConfigError> {
        Ok(Self {
            network,
            passphrase: network.passphrase().to_owned(),
            horizon_url: Url::parse(network.horizon_url())?,
            soroban_rpc_url: Url::parse(network.soroban_rpc_url())?,
            friendbot_url: network.friendbot_url().map(Url::parse).transpose()?,
        })
    }

    /// Reads the configuration from `SENTE_NETWORK` (default `testnet`) and
    /// lets `SENTE_HORIZON_URL`, `SENTE_SOROBAN_RPC_URL` and
    /// `SENTE_FRIENDBOT_URL` override the network defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = match lookup(NETWORK_ENV) {
            Some(name) => name.parse()?,
            None => Network::Testnet,
        };
        let mut config = Self::new(network)?;
        if let Some(url) = lookup(HORIZON_URL_ENV) {
            config.horizon_url = Url::parse(&url)?;
        }
        if let Some(url) = lookup(SOROBAN_RPC_URL_ENV) {
            config.soroban_rpc_url = Url::parse(&url)?;
        }
        if let Some(url) = lookup(FRIENDBOT_URL_ENV) {
            config.friendbot_url = Some(Url::parse(&url)?);
        }
        Ok(config)
    }

    /// Applies the endpoints recorded at deployment time, when present
    #[must_use]
    pub fn with_deployment(mut self, record: &DeploymentRecord) -> Self {
        if let Some(passphrase) = &record.network_passphrase {
            self.passphrase = passphrase.clone();
        }
        if let Some(url) = &record.horizon_url {
            self.horizon_url = url.clone();
        }
        if let Some(url) = &record.soroban_rpc_url {
            self.soroban_rpc_url = url.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_testnet() {
        let config = NetworkConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.passphrase, "Test SDF Network ; September 2015");
        assert_eq!(config.soroban_rpc_url.as_str(), "https://soroban-testnet.stellar.org/");
        assert!(config.friendbot_url.is_some());
    }

    #[test]
    fn overrides_from_environment() {
        let vars: HashMap<&str, &str> = [
            (NETWORK_ENV, "PUBLIC"),
            (SOROBAN_RPC_URL_ENV, "http://localhost:8000/soroban/rpc"),
        ]
        .into_iter()
        .collect();
        let config = NetworkConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.soroban_rpc_url.as_str(), "http://localhost:8000/soroban/rpc");
        assert_eq!(config.horizon_url.as_str(), "https://horizon.stellar.org/");
        assert!(config.friendbot_url.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            NetworkConfig::from_lookup(|key| (key == NETWORK_ENV).then(|| "localnet".to_owned())),
            Err(ConfigError::UnknownNetwork(_))
        ));
        assert!(matches!(
            NetworkConfig::from_lookup(|key| (key == HORIZON_URL_ENV).then(|| "not a url".to_owned())),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
