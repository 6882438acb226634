mod common;
use common::*;

use sente_contract::{ContractRegistry, RegistryError, SenteVault};
use sente_core::types::{Address, FailureKind, Network, TransactionEnvelope, TESTNET_PASSPHRASE};
use sente_core::value::ContractValue;
use sente_signers::{cancellation, MockSignerResponse, Session};
use serde_json::Value;

#[tokio::test]
async fn reads_balances_and_unlock_time() {
    let h = setup().await;
    let token = Address::contract([0xc1; 32]);
    h.mock.push(simulation_ok(ContractValue::Address(token))).unwrap();
    h.mock.push(simulation_ok(ContractValue::I128(700))).unwrap();
    h.mock.push(simulation_ok(ContractValue::I128(300))).unwrap();
    h.mock.push(simulation_ok(ContractValue::U64(1_767_225_600))).unwrap();
    h.mock.push(simulation_ok(ContractValue::I128(1_000))).unwrap();

    let vault = h.vault();
    assert_eq!(vault.token_contract(&h.session).await, Some(token));
    assert_eq!(vault.balance(&h.session, h.alice).await, 700);
    assert_eq!(vault.savings_balance(&h.session, h.alice).await, 300);
    assert_eq!(vault.unlock_time(&h.session, h.alice).await, 1_767_225_600);
    assert_eq!(vault.total_balance(&h.session, h.alice).await, 1_000);
    assert_eq!(h.signer.sign_requests(), 0);
}

#[tokio::test]
async fn reads_without_a_session_fall_back() {
    let h = setup().await;
    let offline = Session::new(Network::Testnet);
    let vault = h.vault();
    assert_eq!(vault.token_contract(&offline).await, None);
    assert_eq!(vault.unlock_time(&offline, h.alice).await, 0);
    assert!(h.mock.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn save_to_vault_encodes_lock_days() {
    let h = setup().await;
    h.mock.push(simulation_ok(void())).unwrap();
    h.mock.push::<Value, _>(send_status("PENDING")).unwrap();
    h.mock.push(tx_success(void())).unwrap();

    assert!(h.vault().save_to_vault(&h.session, 250, 30).await.is_success());

    let (_, params) = h.mock.pop_request().unwrap();
    let envelope =
        TransactionEnvelope::from_base64(params["transaction"].as_str().unwrap(), TESTNET_PASSPHRASE)
            .unwrap();
    let invocation = envelope.tx.operation.as_invocation().unwrap();
    assert_eq!(invocation.function, "save_to_vault");
    assert_eq!(
        invocation.args,
        vec![ContractValue::Address(h.alice), ContractValue::I128(250), ContractValue::U32(30)]
    );
}

#[tokio::test]
async fn writes_need_a_connected_wallet() {
    let h = setup().await;
    let offline = Session::new(Network::Testnet);

    let outcome = h.vault().deposit(&offline, 10).await;

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Configuration);
    assert_eq!(failure.diagnostic, "no wallet connected");
    assert!(h.mock.requests().is_empty());
}

#[tokio::test]
async fn cancelled_signing_aborts_the_call() {
    let h = setup().await;
    h.signer.push_response(MockSignerResponse::Hang);
    h.mock.push(simulation_ok(void())).unwrap();
    let (handle, registration) = cancellation();

    let call = h
        .vault()
        .method::<()>("withdraw", vec![ContractValue::Address(h.alice), ContractValue::I128(1)])
        .from(h.alice)
        .cancel_on(registration);
    let cancel = async {
        while !h.client.gateway().is_busy() {
            tokio::task::yield_now().await;
        }
        handle.cancel();
    };
    let (outcome, _) = tokio::join!(call.invoke(), cancel);

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Signer);
    assert_eq!(failure.diagnostic, "signing request cancelled");
    assert_eq!(h.mock.requests(), vec!["simulateTransaction"]);
}

#[tokio::test]
async fn missing_registry_entry_is_a_configuration_error() {
    let h = setup().await;
    let err = SenteVault::from_registry(&ContractRegistry::new(), h.client.clone()).unwrap_err();
    assert!(matches!(err, RegistryError::Missing(name) if name == "SenteVault"));
}
