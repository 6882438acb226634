use sente_core::types::{Address, DeploymentError, DeploymentRecord};
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;

/// Registry name of the token contract
pub const SENTE_TOKEN: &str = "SenteToken";

/// Registry name of the vault contract
pub const SENTE_VAULT: &str = "SenteVault";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("contract `{0}` is not deployed on this network")]
    Missing(String),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),
}

/// Maps logical contract names to their addresses. Read once at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, Address>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the registry from a deployment record file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        Ok(Self::from(&DeploymentRecord::load(path)?))
    }

    #[must_use]
    pub fn with_contract(mut self, name: impl Into<String>, address: Address) -> Self {
        self.contracts.insert(name.into(), address);
        self
    }

    /// The address registered under `name`
    pub fn get(&self, name: &str) -> Result<Address, RegistryError> {
        self.contracts.get(name).copied().ok_or_else(|| RegistryError::Missing(name.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Address)> {
        self.contracts.iter().map(|(name, address)| (name.as_str(), address))
    }
}

impl From<&DeploymentRecord> for ContractRegistry {
    fn from(record: &DeploymentRecord) -> Self {
        Self { contracts: record.contracts.clone() }
    }
}
