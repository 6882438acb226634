use crate::{errors::RpcError, JsonRpcClient, ProviderError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    borrow::Borrow,
    collections::VecDeque,
    fmt::Debug,
    sync::{Arc, Mutex},
};
use thiserror::Error;

/// Helper response type for `MockProvider`, allowing custom JSON-RPC errors to be provided.
/// `Value` for successful responses, `Error` for JSON-RPC errors.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Successful response with a `serde_json::Value`.
    Value(Value),

    /// Error response with a `JsonRpcError`.
    Error(super::JsonRpcError),
}

#[derive(Clone, Debug)]
/// Mock transport used in test environments.
///
/// Responses are served in the order they were pushed. Every request is
/// recorded so tests can check which calls were made.
pub struct MockProvider {
    requests: Arc<Mutex<VecDeque<(String, Value)>>>,
    log: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonRpcClient for MockProvider {
    type Error = MockError;

    /// Pushes the `(method, params)` to the back of the `requests` queue,
    /// pops the responses from the front of the `responses` queue
    async fn request<T: Debug + Serialize + Send + Sync, R: DeserializeOwned + Send>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, MockError> {
        let params = serde_json::to_value(params)?;
        self.requests.lock().unwrap().push_back((method.to_owned(), params));
        self.log.lock().unwrap().push(method.to_owned());
        let element = self.responses.lock().unwrap().pop_front().ok_or(MockError::EmptyResponses)?;
        match element {
            MockResponse::Value(value) => {
                let res: R = serde_json::from_value(value)?;
                Ok(res)
            }
            MockResponse::Error(error) => Err(MockError::JsonRpcError(error)),
        }
    }
}

impl MockProvider {
    /// Checks that the oldest unchecked request matches `method` and `data`
    pub fn assert_request<T: Serialize + Send + Sync>(
        &self,
        method: &str,
        data: T,
    ) -> Result<(), MockError> {
        let (m, inp) = self.requests.lock().unwrap().pop_front().ok_or(MockError::EmptyRequests)?;
        assert_eq!(m, method);
        assert_eq!(serde_json::to_value(data).expect("could not serialize data"), inp);
        Ok(())
    }

    /// Pops the oldest unchecked request, returning its method and params
    pub fn pop_request(&self) -> Option<(String, Value)> {
        self.requests.lock().unwrap().pop_front()
    }

    /// Names of all methods requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Number of responses that have not been consumed yet
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Instantiates a mock transport
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(VecDeque::new())),
            log: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Pushes the data to the responses
    pub fn push<T: Serialize + Send + Sync, K: Borrow<T>>(&self, data: K) -> Result<(), MockError> {
        let value = serde_json::to_value(data.borrow())?;
        self.responses.lock().unwrap().push_back(MockResponse::Value(value));
        Ok(())
    }

    /// Pushes the data or error to the responses
    pub fn push_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[derive(Error, Debug)]
/// Errors for the `MockProvider`
pub enum MockError {
    /// (De)Serialization error
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// Empty requests array
    #[error("empty requests array, please push some requests")]
    EmptyRequests,

    /// Empty responses array
    #[error("empty responses array, please push some responses")]
    EmptyResponses,

    /// Custom JsonRpcError
    #[error("JSON-RPC error: {0}")]
    JsonRpcError(super::JsonRpcError),
}

impl RpcError for MockError {
    fn as_error_response(&self) -> Option<&super::JsonRpcError> {
        match self {
            MockError::JsonRpcError(e) => Some(e),
            _ => None,
        }
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        match self {
            MockError::SerdeJson(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MockError> for ProviderError {
    fn from(src: MockError) -> Self {
        ProviderError::JsonRpcClientError(Box::new(src))
    }
}
