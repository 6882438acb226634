use crate::{Client, Contract, ContractRegistry, RegistryError, SENTE_VAULT};
use sente_core::{
    types::{Address, TransactionOutcome},
    value::IntoContractValue,
};
use sente_providers::{JsonRpcClient, LedgerClient};
use sente_signers::{ExternalSigner, Session};
use std::ops::Deref;
use tracing::warn;

/// The custodial vault holding deposited tokens and time-locked savings.
#[derive(Debug)]
pub struct SenteVault<P, L, S>(Contract<P, L, S>);

impl<P, L, S> Clone for SenteVault<P, L, S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<P, L, S> Deref for SenteVault<P, L, S> {
    type Target = Contract<P, L, S>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P, L, S> SenteVault<P, L, S>
where
    P: JsonRpcClient,
    L: LedgerClient,
    S: ExternalSigner,
{
    pub fn new(address: Address, client: Client<P, L, S>) -> Self {
        Self(Contract::new(address, client))
    }

    pub fn from_registry(
        registry: &ContractRegistry,
        client: Client<P, L, S>,
    ) -> Result<Self, RegistryError> {
        Ok(Self::new(registry.get(SENTE_VAULT)?, client))
    }

    /// The token the vault holds, `None` if it could not be read
    pub async fn token_contract(&self, session: &Session) -> Option<Address> {
        let from = session.active_account().ok()?;
        match self.method::<Address>("token_contract", vec![]).from(from).call().await {
            Ok(token) => Some(token),
            Err(err) => {
                warn!(contract = %self.address(), %err, "could not read the vault's token");
                None
            }
        }
    }

    /// Unlocked tokens deposited by `account`
    pub async fn balance(&self, session: &Session, account: Address) -> i128 {
        self.read_or(session, "balance", vec![account.into_contract_value()], 0).await
    }

    /// Tokens `account` has locked as savings
    pub async fn savings_balance(&self, session: &Session, account: Address) -> i128 {
        self.read_or(session, "savings_balance", vec![account.into_contract_value()], 0).await
    }

    /// Ledger timestamp at which the savings of `account` unlock
    pub async fn unlock_time(&self, session: &Session, account: Address) -> u64 {
        self.read_or(session, "unlock_time", vec![account.into_contract_value()], 0).await
    }

    pub async fn total_balance(&self, session: &Session, account: Address) -> i128 {
        self.read_or(session, "total_balance", vec![account.into_contract_value()], 0).await
    }

    pub async fn deposit(&self, session: &Session, amount: i128) -> TransactionOutcome<()> {
        self.write_with(session, "deposit", |user| {
            vec![user.into_contract_value(), amount.into_contract_value()]
        })
        .await
    }

    pub async fn withdraw(&self, session: &Session, amount: i128) -> TransactionOutcome<()> {
        self.write_with(session, "withdraw", |user| {
            vec![user.into_contract_value(), amount.into_contract_value()]
        })
        .await
    }

    /// Moves deposited tokens to another account inside the vault
    pub async fn transfer(
        &self,
        session: &Session,
        to: Address,
        amount: i128,
    ) -> TransactionOutcome<()> {
        self.write_with(session, "transfer", |from| {
            vec![from.into_contract_value(), to.into_contract_value(), amount.into_contract_value()]
        })
        .await
    }

    /// Locks `amount` of the deposited balance for `lock_days` days
    pub async fn save_to_vault(
        &self,
        session: &Session,
        amount: i128,
        lock_days: u32,
    ) -> TransactionOutcome<()> {
        self.write_with(session, "save_to_vault", |user| {
            vec![
                user.into_contract_value(),
                amount.into_contract_value(),
                lock_days.into_contract_value(),
            ]
        })
        .await
    }

    /// Withdraws unlocked savings. Fails before the unlock time.
    pub async fn withdraw_from_vault(
        &self,
        session: &Session,
        amount: i128,
    ) -> TransactionOutcome<()> {
        self.write_with(session, "withdraw_from_vault", |user| {
            vec![user.into_contract_value(), amount.into_contract_value()]
        })
        .await
    }
}
