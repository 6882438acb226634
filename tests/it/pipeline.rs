use sente::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

fn simulation(retval: ContractValue, resource_fee: u64) -> SimulateTransactionResponse {
    let mut response = SimulateTransactionResponse::success(900, resource_fee, &retval).unwrap();
    response.cost = Some(SimulationCost { cpu_insns: 800_000, mem_bytes: 12_000 });
    if let Some(data) = &mut response.transaction_data {
        data.resources.instructions = 800_000;
        data.resources.read_bytes = 1024;
        data.resources.write_bytes = 256;
    }
    response
}

fn hash() -> TxHash {
    TxHash([0x42; 32])
}

#[tokio::test(start_paused = true)]
async fn connect_read_and_claim() {
    let alice = Address::account([0x11; 32]);
    let (provider, mock, ledger) = Provider::mocked();
    let signer = MockSigner::new(alice);
    let client = Client::new(provider, signer.clone());
    let registry = ContractRegistry::new()
        .with_contract(SENTE_TOKEN, Address::contract([0x21; 32]))
        .with_contract(SENTE_VAULT, Address::contract([0x22; 32]));

    // connecting on the test network funds the account
    let mut session = Session::new(Network::Testnet);
    assert_eq!(client.connect_session(&mut session).await.unwrap(), alice);
    assert_eq!(client.provider().native_balance(&alice).await.unwrap(), "10000.0000000");

    let token = SenteToken::from_registry(&registry, client.clone()).unwrap();
    mock.push(simulation(ContractValue::U32(6), 0)).unwrap();
    mock.push(simulation(ContractValue::I128(0), 0)).unwrap();
    assert_eq!(token.decimals(&session).await, 6);
    assert_eq!(token.balance(&session, alice).await, 0);

    mock.push(simulation(ContractValue::Void, 61_000)).unwrap();
    mock.push::<Value, _>(json!({"status": "PENDING", "hash": hash(), "latestLedger": 900}))
        .unwrap();
    mock.push::<Value, _>(json!({"status": "NOT_FOUND", "latestLedger": 900})).unwrap();
    mock.push::<Value, _>(json!({"status": "NOT_FOUND", "latestLedger": 901})).unwrap();
    mock.push(GetTransactionResponse::success(902, 902, &ContractValue::Void).unwrap()).unwrap();

    let start = tokio::time::Instant::now();
    let outcome = token.claim_faucet(&session).await;
    assert_eq!(outcome, TransactionOutcome::Success(()));
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
    assert_eq!(signer.sign_requests(), 1);
    assert_eq!(mock.pending_responses(), 0);

    // the ledger account only changed through funding
    assert_eq!(ledger.account(&alice).unwrap().sequence, 0);
}

#[tokio::test]
async fn simulation_errors_never_reach_the_signer() {
    let alice = Address::account([0x11; 32]);
    let (provider, mock, ledger) = Provider::mocked();
    ledger.insert_account(Account::new(alice, 10));
    let signer = MockSigner::new(alice);
    let client = Client::new(provider, signer.clone());
    let vault = Contract::new(Address::contract([0x22; 32]), client);

    mock.push(SimulateTransactionResponse::failure(900, "Error(Contract, #3): locked")).unwrap();
    let err = vault
        .method::<()>("withdraw_from_vault", vec![alice.into_contract_value(), 5i128.into_contract_value()])
        .from(alice)
        .send()
        .await
        .unwrap_err();

    assert!(matches!(&err, ContractError::Simulation(sim) if sim.message.contains("locked")));
    assert_eq!(Failure::from(err).kind, FailureKind::Simulation);
    assert_eq!(mock.requests(), vec!["simulateTransaction"]);
    assert_eq!(signer.sign_requests(), 0);
    assert!(ledger.submissions().is_empty());
}

#[tokio::test]
async fn simulated_resources_are_merged_before_signing() {
    let alice = Address::account([0x11; 32]);
    let (provider, mock, ledger) = Provider::mocked();
    ledger.insert_account(Account::new(alice, 10));
    let client = Client::new(provider, MockSigner::new(alice));
    let token = Contract::new(Address::contract([0x21; 32]), client.clone());

    mock.push(simulation(ContractValue::Void, 7_500)).unwrap();
    let call = token
        .method::<()>("mint", vec![alice.into_contract_value(), 1i128.into_contract_value()])
        .from(alice)
        .fee(200_000);
    let (tx, simulation) = call.simulate().await.unwrap();
    assert!(!tx.is_assembled());

    let assembled = transaction::assemble(tx.clone(), &simulation).unwrap();
    assert_eq!(assembled.fee, 207_500);
    assert_eq!(assembled.inclusion_fee(), 200_000);
    assert_eq!(assembled.sequence, tx.sequence);

    let signed = client.gateway().sign_transaction(&assembled, None).await.unwrap();
    assert_eq!(signed.transaction(), &assembled);
    assert_eq!(signed.hash(), assembled.hash().unwrap());
    let invocation = signed.transaction().operation.as_invocation().unwrap();
    assert_eq!(invocation.function, "mint");
    assert_eq!(invocation.args[1], ContractValue::I128(1));
}
