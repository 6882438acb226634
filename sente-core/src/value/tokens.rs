use super::{CodecError, ContractValue, ValueType};
use crate::types::Address;

/// Types that can be passed as contract arguments
pub trait IntoContractValue {
    fn into_contract_value(self) -> ContractValue;
}

/// Types that a contract return value can be decoded into
pub trait FromContractValue: Sized {
    fn from_contract_value(value: ContractValue) -> Result<Self, CodecError>;
}

fn mismatch(expected: ValueType, found: &ContractValue) -> CodecError {
    CodecError::TypeMismatch { expected, found: found.value_type().as_str() }
}

macro_rules! impl_token {
    ($ty:ty, $variant:ident) => {
        impl IntoContractValue for $ty {
            fn into_contract_value(self) -> ContractValue {
                ContractValue::$variant(self)
            }
        }

        impl FromContractValue for $ty {
            fn from_contract_value(value: ContractValue) -> Result<Self, CodecError> {
                match value {
                    ContractValue::$variant(inner) => Ok(inner),
                    other => Err(mismatch(ValueType::$variant, &other)),
                }
            }
        }
    };
}

impl_token!(bool, Bool);
impl_token!(u32, U32);
impl_token!(i32, I32);
impl_token!(u64, U64);
impl_token!(i64, I64);
impl_token!(i128, I128);
impl_token!(Address, Address);

impl IntoContractValue for String {
    fn into_contract_value(self) -> ContractValue {
        ContractValue::String(self)
    }
}

impl IntoContractValue for &str {
    fn into_contract_value(self) -> ContractValue {
        ContractValue::String(self.to_owned())
    }
}

/// Accepts both strings and symbols; token metadata is stored either way.
impl FromContractValue for String {
    fn from_contract_value(value: ContractValue) -> Result<Self, CodecError> {
        match value {
            ContractValue::String(s) | ContractValue::Symbol(s) => Ok(s),
            other => Err(mismatch(ValueType::String, &other)),
        }
    }
}

impl IntoContractValue for () {
    fn into_contract_value(self) -> ContractValue {
        ContractValue::Void
    }
}

impl FromContractValue for () {
    fn from_contract_value(value: ContractValue) -> Result<Self, CodecError> {
        match value {
            ContractValue::Void => Ok(()),
            other => Err(mismatch(ValueType::Void, &other)),
        }
    }
}

impl IntoContractValue for ContractValue {
    fn into_contract_value(self) -> ContractValue {
        self
    }
}

impl FromContractValue for ContractValue {
    fn from_contract_value(value: ContractValue) -> Result<Self, CodecError> {
        Ok(value)
    }
}
