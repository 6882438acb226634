use sente::prelude::*;

fn payment(snapshot: Account, to: Address) -> Transaction {
    transaction::TransactionBuilder::new(snapshot, TESTNET_PASSPHRASE)
        .operation(Operation::Payment(Payment { destination: to, amount: 25_000_000 }))
        .memo(Memo::text("rent").unwrap())
        .build()
        .unwrap()
}

#[tokio::test]
async fn a_snapshot_builds_one_transaction() {
    let (alice, bob) = (Address::account([0x11; 32]), Address::account([0x12; 32]));
    let (provider, _, ledger) = Provider::mocked();
    ledger.insert_account(Account::new(alice, 99));
    let gateway = SignerGateway::new(MockSigner::new(alice));

    let snapshot = provider.load_account(&alice).await.unwrap();
    let first = gateway.sign_transaction(&payment(snapshot.clone(), bob), None).await.unwrap();
    let second = gateway.sign_transaction(&payment(snapshot, bob), None).await.unwrap();
    assert_eq!(first.transaction().sequence, second.transaction().sequence);

    let receipt = provider.submit_raw_transaction(&first).await.unwrap();
    assert!(receipt.successful);
    assert_eq!(receipt.hash, first.hash());

    let err = provider.submit_raw_transaction(&second).await.unwrap_err();
    assert!(matches!(err, ProviderError::Submission(SubmissionError::DuplicateSequence { .. })));
    assert!(ContractError::from(err).requires_rebuild());
    assert_eq!(ledger.submissions(), vec![first.encoded().to_owned()]);
}

#[tokio::test]
async fn unsigned_envelopes_are_refused() {
    let alice = Address::account([0x11; 32]);
    let (provider, _, ledger) = Provider::mocked();
    ledger.insert_account(Account::new(alice, 1));

    let tx = payment(provider.load_account(&alice).await.unwrap(), alice);
    let unsigned = SignedTransaction::from_encoded(tx.to_envelope().unwrap(), TESTNET_PASSPHRASE).unwrap();
    let err = provider.submit_raw_transaction(&unsigned).await.unwrap_err();
    assert!(err.is_submission_error());
}

#[test]
fn amounts_round_trip_through_strings() {
    let units = parse_amount("12.5", 6).unwrap();
    assert_eq!(units, 12_500_000);
    assert_eq!(format_amount(units, 6).unwrap(), "12.500000");
    assert_eq!(parse_amount("0.1234567", 6).unwrap(), 123_456);
    assert_eq!(format_address(&Address::account([0x11; 32]).to_string()).len(), 11);
}
