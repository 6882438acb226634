use crate::{ExternalSigner, SignerError, REQUEST_PENDING_CODE, USER_REJECTED_CODE};
use async_trait::async_trait;
use sente_core::{
    stellar_xdr::curr::{Signature, SignatureHint},
    types::{Address, DecoratedSignature, EnvelopeError, TransactionEnvelope},
};
use sha2::{Digest, Sha256};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

/// How the [`MockSigner`] answers the next signing request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockSignerResponse {
    /// Sign the envelope as received
    Approve,
    /// Sign after waiting, simulating a user who takes their time
    Delay(Duration),
    /// Decline with code 4001
    Reject,
    /// Report another pending request with code -32002
    Busy,
    /// Act as a locked wallet
    Locked,
    /// Never answer
    Hang,
    /// Sign a different transaction than the one received
    Tamper,
    /// Return the envelope without adding a signature
    Unsigned,
}

#[derive(Debug)]
struct MockSignerState {
    installed: bool,
    holds_access: bool,
    account: Option<Address>,
    network: String,
    responses: VecDeque<MockSignerResponse>,
    sign_requests: usize,
}

/// Wallet stand-in used in test environments.
///
/// Requests are answered from a queue of [`MockSignerResponse`]s, falling
/// back to `Approve` when the queue is empty. Signatures are not real
/// signatures: they are a digest of the transaction hash and the account.
#[derive(Clone, Debug)]
pub struct MockSigner {
    state: Arc<Mutex<MockSignerState>>,
}

impl MockSigner {
    /// An installed, unlocked wallet on the test network
    pub fn new(account: Address) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockSignerState {
                installed: true,
                holds_access: false,
                account: Some(account),
                network: "TESTNET".to_owned(),
                responses: VecDeque::new(),
                sign_requests: 0,
            })),
        }
    }

    /// A wallet that is not installed at all
    pub fn not_installed() -> Self {
        let signer = Self::new(Address::account([0u8; 32]));
        {
            let mut state = signer.state.lock().unwrap();
            state.installed = false;
            state.account = None;
        }
        signer
    }

    /// Switches the selected account, `None` locks the wallet
    pub fn set_account(&self, account: Option<Address>) {
        self.state.lock().unwrap().account = account;
    }

    pub fn set_network(&self, network: impl Into<String>) {
        self.state.lock().unwrap().network = network.into();
    }

    /// Leaves access requests unanswered, like a user who never responds to
    /// the connection prompt
    pub fn hold_access(&self, hold: bool) {
        self.state.lock().unwrap().holds_access = hold;
    }

    pub fn push_response(&self, response: MockSignerResponse) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    /// Number of signing requests that reached the wallet
    pub fn sign_requests(&self) -> usize {
        self.state.lock().unwrap().sign_requests
    }

    fn unlocked_account(&self) -> Result<Address, SignerError> {
        let state = self.state.lock().unwrap();
        if !state.installed {
            return Err(SignerError::Unavailable("wallet is not installed".to_owned()))
        }
        state.account.ok_or_else(|| SignerError::Unavailable("wallet is locked".to_owned()))
    }

    fn signature(
        account: &Address,
        envelope: &TransactionEnvelope,
    ) -> Result<DecoratedSignature, EnvelopeError> {
        let payload = account.payload();
        let hash = envelope.tx.hash()?;
        let mut signature = Sha256::new().chain_update(hash.0).chain_update(payload).finalize().to_vec();
        signature.extend(Sha256::new().chain_update(payload).chain_update(hash.0).finalize());

        let mut hint = [0u8; 4];
        hint.copy_from_slice(&payload[28..]);
        Ok(DecoratedSignature {
            hint: SignatureHint(hint),
            signature: Signature(signature.try_into()?),
        })
    }
}

#[async_trait]
impl ExternalSigner for MockSigner {
    async fn is_available(&self) -> bool {
        self.state.lock().unwrap().installed
    }

    async fn request_access(&self) -> Result<Address, SignerError> {
        let holds_access = self.state.lock().unwrap().holds_access;
        if holds_access {
            futures_util::future::pending::<()>().await;
        }
        self.unlocked_account()
    }

    async fn public_key(&self) -> Result<Address, SignerError> {
        self.unlocked_account()
    }

    async fn network(&self) -> Result<String, SignerError> {
        let state = self.state.lock().unwrap();
        if !state.installed {
            return Err(SignerError::Unavailable("wallet is not installed".to_owned()))
        }
        Ok(state.network.clone())
    }

    async fn sign_transaction(
        &self,
        envelope: &str,
        network_passphrase: &str,
    ) -> Result<String, SignerError> {
        let account = self.unlocked_account()?;
        let response = {
            let mut state = self.state.lock().unwrap();
            state.sign_requests += 1;
            state.responses.pop_front().unwrap_or(MockSignerResponse::Approve)
        };

        let mut envelope = TransactionEnvelope::from_base64(envelope, network_passphrase)?;
        match response {
            MockSignerResponse::Approve => {}
            MockSignerResponse::Delay(delay) => tokio::time::sleep(delay).await,
            MockSignerResponse::Reject => {
                return Err(SignerError::from_code(USER_REJECTED_CODE, "user declined"))
            }
            MockSignerResponse::Busy => {
                return Err(SignerError::from_code(REQUEST_PENDING_CODE, "request pending"))
            }
            MockSignerResponse::Locked => {
                return Err(SignerError::Unavailable("wallet is locked".to_owned()))
            }
            MockSignerResponse::Hang => futures_util::future::pending::<()>().await,
            MockSignerResponse::Tamper => envelope.tx.fee += 1,
            MockSignerResponse::Unsigned => return Ok(envelope.to_base64()?),
        }

        let signature = Self::signature(&account, &envelope)?;
        envelope.signatures.push(signature);
        Ok(envelope.to_base64()?)
    }
}
