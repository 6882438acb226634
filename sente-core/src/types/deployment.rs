use super::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("could not access deployment record: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The record written after deploying the contracts: which network they live
/// on and the address of each contract by logical name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soroban_rpc_url: Option<Url>,
    pub deployer: Address,
    pub contracts: BTreeMap<String, Address>,
    pub timestamp: DateTime<Utc>,
}

impl DeploymentRecord {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeploymentError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DeploymentError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn contract(&self, name: &str) -> Option<Address> {
        self.contracts.get(name).copied()
    }
}
