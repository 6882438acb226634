use crate::{Client, Contract, ContractRegistry, RegistryError, SENTE_TOKEN};
use sente_core::{
    types::{Address, TransactionOutcome},
    utils::DEFAULT_DECIMALS,
    value::IntoContractValue,
};
use sente_providers::{JsonRpcClient, LedgerClient};
use sente_signers::{ExternalSigner, Session};
use std::ops::Deref;

/// The fungible token with a rate-limited faucet.
///
/// Reads never fail: on error they log a warning and return a fallback value.
/// Writes return the outcome of the transaction and are never retried.
#[derive(Debug)]
pub struct SenteToken<P, L, S>(Contract<P, L, S>);

impl<P, L, S> Clone for SenteToken<P, L, S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<P, L, S> Deref for SenteToken<P, L, S> {
    type Target = Contract<P, L, S>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P, L, S> SenteToken<P, L, S>
where
    P: JsonRpcClient,
    L: LedgerClient,
    S: ExternalSigner,
{
    pub fn new(address: Address, client: Client<P, L, S>) -> Self {
        Self(Contract::new(address, client))
    }

    /// Looks the token up in `registry`
    pub fn from_registry(
        registry: &ContractRegistry,
        client: Client<P, L, S>,
    ) -> Result<Self, RegistryError> {
        Ok(Self::new(registry.get(SENTE_TOKEN)?, client))
    }

    pub async fn name(&self, session: &Session) -> String {
        self.read_or(session, "name", vec![], "Unknown".to_owned()).await
    }

    pub async fn symbol(&self, session: &Session) -> String {
        self.read_or(session, "symbol", vec![], "UNK".to_owned()).await
    }

    pub async fn decimals(&self, session: &Session) -> u32 {
        self.read_or(session, "decimals", vec![], DEFAULT_DECIMALS).await
    }

    pub async fn total_supply(&self, session: &Session) -> i128 {
        self.read_or(session, "total_supply", vec![], 0).await
    }

    /// The balance of `account` in the token's smallest unit
    pub async fn balance(&self, session: &Session, account: Address) -> i128 {
        self.read_or(session, "balance", vec![account.into_contract_value()], 0).await
    }

    pub async fn allowance(&self, session: &Session, from: Address, spender: Address) -> i128 {
        let args = vec![from.into_contract_value(), spender.into_contract_value()];
        self.read_or(session, "allowance", args, 0).await
    }

    /// Whether `account` is out of its faucet cooldown
    pub async fn can_claim_faucet(&self, session: &Session, account: Address) -> bool {
        self.read_or(session, "can_claim_faucet", vec![account.into_contract_value()], false).await
    }

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

    pub async fn approve(
        &self,
        session: &Session,
        spender: Address,
        amount: i128,
    ) -> TransactionOutcome<()> {
        self.write_with(session, "approve", |from| {
            vec![
                from.into_contract_value(),
                spender.into_contract_value(),
                amount.into_contract_value(),
            ]
        })
        .await
    }

    /// Moves `amount` from `from` to `to` using the session account's allowance
    pub async fn transfer_from(
        &self,
        session: &Session,
        from: Address,
        to: Address,
        amount: i128,
    ) -> TransactionOutcome<()> {
        self.write_with(session, "transfer_from", |spender| {
            vec![
                spender.into_contract_value(),
                from.into_contract_value(),
                to.into_contract_value(),
                amount.into_contract_value(),
            ]
        })
        .await
    }

    /// Mints new tokens. Only the token admin is authorized.
    pub async fn mint(&self, session: &Session, to: Address, amount: i128) -> TransactionOutcome<()> {
        self.write(session, "mint", vec![to.into_contract_value(), amount.into_contract_value()])
            .await
    }

    /// Claims from the faucet. Fails while the cooldown is running.
    pub async fn claim_faucet(&self, session: &Session) -> TransactionOutcome<()> {
        self.write_with(session, "claim_faucet", |claimer| vec![claimer.into_contract_value()])
            .await
    }
}
