#![allow(dead_code)]
use sente_contract::{Client, ContractRegistry, SenteToken, SenteVault, SENTE_TOKEN, SENTE_VAULT};
use sente_core::{
    stellar_xdr::curr::TransactionResultResult,
    types::{
        transaction_result, Account, Address, GetTransactionResponse, Network,
        SendTransactionResponse, SendTransactionStatus, SimulateTransactionResponse,
        SimulationCost, TxHash,
    },
    value::ContractValue,
};
use sente_providers::{MockLedger, MockProvider, Provider};
use sente_signers::{MockSigner, Session};
use serde_json::{json, Value};

pub type MockClient = Client<MockProvider, MockLedger, MockSigner>;

pub struct Harness {
    pub alice: Address,
    pub client: MockClient,
    pub mock: MockProvider,
    pub ledger: MockLedger,
    pub signer: MockSigner,
    pub session: Session,
    pub registry: ContractRegistry,
}

impl Harness {
    pub fn token(&self) -> SenteToken<MockProvider, MockLedger, MockSigner> {
        SenteToken::from_registry(&self.registry, self.client.clone()).unwrap()
    }

    pub fn vault(&self) -> SenteVault<MockProvider, MockLedger, MockSigner> {
        SenteVault::from_registry(&self.registry, self.client.clone()).unwrap()
    }
}

/// A funded account with a connected wallet on the test network
pub async fn setup() -> Harness {
    let alice = Address::account([0xa1; 32]);
    let (provider, mock, ledger) = Provider::mocked();
    ledger.insert_account(Account::new(alice, 4_000).with_native_balance("10000.0000000"));
    let signer = MockSigner::new(alice);
    let client = Client::new(provider, signer.clone());

    let mut session = Session::new(Network::Testnet);
    session.connect(&signer).await.unwrap();

    let registry = ContractRegistry::new()
        .with_contract(SENTE_TOKEN, Address::contract([0xc1; 32]))
        .with_contract(SENTE_VAULT, Address::contract([0xc2; 32]));

    Harness { alice, client, mock, ledger, signer, session, registry }
}

pub fn tx_hash() -> TxHash {
    TxHash([0xab; 32])
}

pub fn simulation_ok(retval: ContractValue) -> SimulateTransactionResponse {
    let mut response = SimulateTransactionResponse::success(500, 52_311, &retval).unwrap();
    response.cost = Some(SimulationCost { cpu_insns: 1_200_000, mem_bytes: 40_000 });
    response
}

pub fn simulation_err(message: &str) -> SimulateTransactionResponse {
    SimulateTransactionResponse::failure(500, message)
}

pub fn send_status(status: &str) -> Value {
    json!({"status": status, "hash": tx_hash(), "latestLedger": 500})
}

pub fn send_error(result: TransactionResultResult) -> SendTransactionResponse {
    SendTransactionResponse {
        status: SendTransactionStatus::Error,
        hash: tx_hash(),
        latest_ledger: 500,
        error_result: Some(transaction_result(result)),
    }
}

pub fn tx_status(status: &str) -> Value {
    json!({"status": status, "latestLedger": 501})
}

pub fn tx_success(retval: ContractValue) -> GetTransactionResponse {
    GetTransactionResponse::success(502, 502, &retval).unwrap()
}

pub fn tx_failed() -> GetTransactionResponse {
    GetTransactionResponse::failed(503, 503, TransactionResultResult::TxFailed(Default::default()))
}

pub fn void() -> ContractValue {
    ContractValue::Void
}
