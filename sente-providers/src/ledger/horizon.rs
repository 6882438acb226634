use super::LedgerClient;
use crate::{errors::RpcError, JsonRpcError, ProviderError, SubmissionError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sente_core::types::{Account, Address, SubmitReceipt};
use serde::{de::DeserializeOwned, Deserialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// A client of a Horizon-style REST ledger endpoint.
///
/// # Example
///
/// ```no_run
/// use sente_core::types::{Address, Network};
/// use sente_providers::{Horizon, LedgerClient};
///
/// # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
/// let horizon = Horizon::new(Network::Testnet.horizon_url().parse::<url::Url>()?);
/// let id: Address = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7".parse()?;
/// let account = horizon.load_account(&id).await?;
/// println!("sequence: {}", account.sequence);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Horizon {
    client: Client,
    url: Url,
    friendbot: Option<Url>,
}

#[derive(Error, Debug)]
/// Error thrown when talking to the ledger endpoint
pub enum HorizonError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("account not found: {0}")]
    NotFound(String),

    /// The endpoint rejected a submission
    #[error("submission rejected with http status {status}: {}", .code.as_deref().unwrap_or("no result code"))]
    Rejected { status: u16, code: Option<String> },

    #[error("funding failed with http status {0}")]
    FundingFailed(u16),

    #[error("no funding service configured for this network")]
    FriendbotUnavailable,

    #[error("Deserialization Error: {err}. Response: {text}")]
    SerdeJson { err: serde_json::Error, text: String },
}

impl RpcError for HorizonError {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        None
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        match self {
            HorizonError::SerdeJson { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl From<HorizonError> for ProviderError {
    fn from(src: HorizonError) -> Self {
        match src {
            HorizonError::ReqwestError(err) => ProviderError::HTTPError(err),
            HorizonError::NotFound(account) => ProviderError::AccountNotFound(account),
            HorizonError::Rejected { status, code } => ProviderError::Submission(
                SubmissionError::from_result_code(&status.to_string(), code.as_deref()),
            ),
            other => ProviderError::LedgerClientError(Box::new(other)),
        }
    }
}

#[derive(Deserialize)]
struct Problem {
    #[serde(default)]
    extras: Option<ProblemExtras>,
}

#[derive(Deserialize)]
struct ProblemExtras {
    result_codes: ResultCodes,
}

#[derive(Deserialize)]
struct ResultCodes {
    transaction: String,
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, HorizonError> {
    serde_json::from_slice(body).map_err(|err| HorizonError::SerdeJson {
        err,
        text: String::from_utf8_lossy(body).to_string(),
    })
}

/// Endpoint paths are joined onto the base url, which only keeps its last
/// segment when the path ends with a slash
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl Horizon {
    pub fn new(url: impl Into<Url>) -> Self {
        Self::new_with_client(url, Client::new())
    }

    pub fn new_with_client(url: impl Into<Url>, client: Client) -> Self {
        Self { client, url: with_trailing_slash(url.into()), friendbot: None }
    }

    /// Sets the funding service used by [`LedgerClient::fund_account`]
    #[must_use]
    pub fn with_friendbot(mut self, url: impl Into<Url>) -> Self {
        self.friendbot = Some(url.into());
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl LedgerClient for Horizon {
    type Error = HorizonError;

    async fn load_account(&self, account: &Address) -> Result<Account, HorizonError> {
        let url = self.url.join(&format!("accounts/{account}"))?;
        let res = self.client.get(url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(HorizonError::NotFound(account.to_string()))
        }
        let res = res.error_for_status()?;
        let body = res.bytes().await?;
        parse_body(&body)
    }

    async fn submit_transaction(&self, envelope: &str) -> Result<SubmitReceipt, HorizonError> {
        let url = self.url.join("transactions")?;
        let res = self.client.post(url).form(&[("tx", envelope)]).send().await?;
        let status = res.status();
        let body = res.bytes().await?;
        if status.is_success() {
            return parse_body(&body)
        }

        let code = serde_json::from_slice::<Problem>(&body)
            .ok()
            .and_then(|problem| problem.extras)
            .map(|extras| extras.result_codes.transaction);
        debug!(status = status.as_u16(), ?code, "submission rejected");
        Err(HorizonError::Rejected { status: status.as_u16(), code })
    }

    async fn fund_account(&self, account: &Address) -> Result<(), HorizonError> {
        let url = self.friendbot.clone().ok_or(HorizonError::FriendbotUnavailable)?;
        let res = self.client.get(url).query(&[("addr", account.to_string())]).send().await?;
        if !res.status().is_success() {
            return Err(HorizonError::FundingFailed(res.status().as_u16()))
        }
        Ok(())
    }
}
