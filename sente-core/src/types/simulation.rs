use super::{
    serde_helpers::{stringified, stringified_opt},
    xdr::{base64_xdr, base64_xdr_opt, base64_xdr_seq},
    SorobanData,
};
use crate::value::{CodecError, ContractValue};
use serde::{Deserialize, Serialize};
use stellar_xdr::curr::{
    ExtensionPoint, LedgerFootprint, ScVal, SorobanAuthorizationEntry, SorobanResources,
};
use thiserror::Error;

/// Resources consumed by a simulated invocation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationCost {
    #[serde(with = "stringified")]
    pub cpu_insns: u64,
    #[serde(with = "stringified")]
    pub mem_bytes: u64,
}

/// Per-invocation result of a simulation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationHostResult {
    #[serde(rename = "xdr", with = "base64_xdr")]
    pub retval: ScVal,
    #[serde(default, with = "base64_xdr_seq")]
    pub auth: Vec<SorobanAuthorizationEntry>,
}

/// Raw `simulateTransaction` response, as sent by the execution endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
    pub latest_ledger: u32,
    #[serde(default, with = "stringified_opt", skip_serializing_if = "Option::is_none")]
    pub min_resource_fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<SimulationCost>,
    #[serde(default, with = "base64_xdr_opt", skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<SorobanData>,
    #[serde(default)]
    pub results: Vec<SimulationHostResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulateTransactionResponse {
    /// A successful dry run touching no ledger keys, as served by test doubles
    pub fn success(
        latest_ledger: u32,
        min_resource_fee: u64,
        retval: &ContractValue,
    ) -> Result<Self, CodecError> {
        let transaction_data = SorobanData {
            ext: ExtensionPoint::V0,
            resources: SorobanResources {
                footprint: LedgerFootprint {
                    read_only: Default::default(),
                    read_write: Default::default(),
                },
                instructions: 0,
                read_bytes: 0,
                write_bytes: 0,
            },
            resource_fee: i64::try_from(min_resource_fee).unwrap_or(i64::MAX),
        };
        Ok(Self {
            latest_ledger,
            min_resource_fee: Some(min_resource_fee),
            cost: Some(SimulationCost::default()),
            transaction_data: Some(transaction_data),
            results: vec![SimulationHostResult { retval: retval.try_into()?, auth: Vec::new() }],
            error: None,
        })
    }

    /// A failed dry run with the endpoint's diagnostic
    pub fn failure(latest_ledger: u32, message: impl Into<String>) -> Self {
        Self {
            latest_ledger,
            min_resource_fee: None,
            cost: None,
            transaction_data: None,
            results: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// A successful dry run: what the invocation costs, which ledger keys it
/// touches and what it returns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationSuccess {
    pub latest_ledger: u32,
    pub min_resource_fee: u64,
    pub cost: SimulationCost,
    pub transaction_data: SorobanData,
    pub return_value: ContractValue,
    pub auth: Vec<SorobanAuthorizationEntry>,
}

/// The dry run reverted, failed type checking or could not resolve the contract
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SimulationError {
    pub message: String,
    pub latest_ledger: u32,
}

/// Outcome of a simulation, consumed once by the pipeline
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulationResult {
    Success(SimulationSuccess),
    Error(SimulationError),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success(_))
    }

    pub fn into_result(self) -> Result<SimulationSuccess, SimulationError> {
        match self {
            SimulationResult::Success(success) => Ok(success),
            SimulationResult::Error(err) => Err(err),
        }
    }
}

impl From<SimulateTransactionResponse> for SimulationResult {
    fn from(response: SimulateTransactionResponse) -> Self {
        let latest_ledger = response.latest_ledger;
        let error = |message: String| SimulationResult::Error(SimulationError { message, latest_ledger });
        if let Some(message) = response.error {
            return error(message)
        }

        let (Some(min_resource_fee), Some(transaction_data)) =
            (response.min_resource_fee, response.transaction_data)
        else {
            return error("simulation response carries no resource data".to_owned())
        };

        let (return_value, auth) = match response.results.into_iter().next() {
            Some(result) => match ContractValue::try_from(result.retval) {
                Ok(value) => (value, result.auth),
                Err(err) => return error(format!("cannot decode simulated return value: {err}")),
            },
            None => (ContractValue::Void, Vec::new()),
        };
        SimulationResult::Success(SimulationSuccess {
            latest_ledger,
            min_resource_fee,
            cost: response.cost.unwrap_or_default(),
            transaction_data,
            return_value,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::xdr::to_base64;
    use stellar_xdr::curr::{Int128Parts, ScVec};

    #[test]
    fn parses_success() {
        let data = SimulateTransactionResponse::success(1, 58181, &ContractValue::Void)
            .unwrap()
            .transaction_data
            .unwrap();
        let retval = to_base64(&ScVal::I128(Int128Parts { hi: 0, lo: 25_000_000 })).unwrap();
        let json = format!(
            r#"{{
                "latestLedger": 2552139,
                "minResourceFee": "58181",
                "cost": {{"cpuInsns": "1240100", "memBytes": "161637"}},
                "transactionData": "{}",
                "results": [{{"xdr": "{retval}", "auth": []}}]
            }}"#,
            to_base64(&data).unwrap()
        );
        let response: SimulateTransactionResponse = serde_json::from_str(&json).unwrap();
        let success = SimulationResult::from(response).into_result().unwrap();
        assert_eq!(success.min_resource_fee, 58181);
        assert_eq!(success.cost.cpu_insns, 1240100);
        assert_eq!(success.transaction_data, data);
        assert_eq!(success.return_value, ContractValue::I128(25_000_000));
    }

    #[test]
    fn constructed_responses_survive_the_wire() {
        let response =
            SimulateTransactionResponse::success(9, 100, &ContractValue::Symbol("SNT".into()))
                .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["transactionData"].is_string());
        let back: SimulateTransactionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn error_variant_keeps_diagnostic() {
        let json = r#"{
            "latestLedger": 7,
            "error": "HostError: Error(Contract, #1)\nPlease wait 24 hours between claims"
        }"#;
        let response: SimulateTransactionResponse = serde_json::from_str(json).unwrap();
        let err = SimulationResult::from(response).into_result().unwrap_err();
        assert!(err.to_string().contains("Please wait 24 hours between claims"));
        assert_eq!(err.latest_ledger, 7);
    }

    #[test]
    fn missing_resource_data_is_an_error() {
        let response: SimulateTransactionResponse =
            serde_json::from_str(r#"{"latestLedger": 1}"#).unwrap();
        assert!(!SimulationResult::from(response).is_success());
    }

    #[test]
    fn unsupported_return_values_are_errors() {
        let mut response = SimulateTransactionResponse::success(1, 1, &ContractValue::Void).unwrap();
        response.results[0].retval = ScVal::Vec(Some(ScVec(Default::default())));
        let err = SimulationResult::from(response).into_result().unwrap_err();
        assert!(err.message.contains("vec"));
    }
}
