//! Values crossing the contract boundary
mod codec;
pub use codec::{decode, encode, CodecError, Native};

mod tokens;
pub use tokens::{FromContractValue, IntoContractValue};

mod xdr;

use crate::types::Address;
use std::{fmt, str::FromStr};

/// A contract argument or return value.
///
/// A closed subset of the contract runtime's value type. On the wire it is an
/// `ScVal` in base64 XDR, which is also its serde form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContractValue {
    #[default]
    Void,
    Bool(bool),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    I128(i128),
    String(String),
    Symbol(String),
    Address(Address),
}

impl ContractValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ContractValue::Void => ValueType::Void,
            ContractValue::Bool(_) => ValueType::Bool,
            ContractValue::U32(_) => ValueType::U32,
            ContractValue::I32(_) => ValueType::I32,
            ContractValue::U64(_) => ValueType::U64,
            ContractValue::I64(_) => ValueType::I64,
            ContractValue::I128(_) => ValueType::I128,
            ContractValue::String(_) => ValueType::String,
            ContractValue::Symbol(_) => ValueType::Symbol,
            ContractValue::Address(_) => ValueType::Address,
        }
    }
}

/// The declared type of a contract parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Bool,
    U32,
    I32,
    U64,
    I64,
    I128,
    String,
    Symbol,
    Address,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::Bool => "bool",
            ValueType::U32 => "u32",
            ValueType::I32 => "i32",
            ValueType::U64 => "u64",
            ValueType::I64 => "i64",
            ValueType::I128 => "i128",
            ValueType::String => "string",
            ValueType::Symbol => "symbol",
            ValueType::Address => "address",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "void" => ValueType::Void,
            "bool" => ValueType::Bool,
            "u32" => ValueType::U32,
            "i32" => ValueType::I32,
            "u64" => ValueType::U64,
            "i64" => ValueType::I64,
            "i128" => ValueType::I128,
            "string" => ValueType::String,
            "symbol" => ValueType::Symbol,
            "address" => ValueType::Address,
            other => return Err(CodecError::UnsupportedType(other.to_owned())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        for ty in ["void", "bool", "u32", "i32", "u64", "i64", "i128", "string", "symbol", "address"] {
            assert_eq!(ty.parse::<ValueType>().unwrap().as_str(), ty);
        }
        assert!(matches!("vec".parse::<ValueType>(), Err(CodecError::UnsupportedType(_))));
    }

    #[test]
    fn value_types() {
        assert_eq!(ContractValue::I128(1).value_type(), ValueType::I128);
        assert_eq!(ContractValue::Symbol("SNT".into()).value_type(), ValueType::Symbol);
        assert_eq!(ContractValue::default().value_type(), ValueType::Void);
    }
}
