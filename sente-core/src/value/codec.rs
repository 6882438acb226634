use super::{ContractValue, ValueType};
use crate::types::{Address, AddressError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unsupported contract value type `{0}`")]
    UnsupportedType(String),
    #[error("expected {expected}, got {found}")]
    TypeMismatch { expected: ValueType, found: &'static str },
    #[error("{value} does not fit in {ty}")]
    OutOfRange { value: i128, ty: ValueType },
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("invalid symbol `{0}`")]
    InvalidSymbol(String),
    #[error("malformed contract value: {0}")]
    Malformed(String),
}

/// Longest symbol the contract runtime accepts
const MAX_SYMBOL_LEN: usize = 32;

pub(crate) fn is_valid_symbol(s: &str) -> bool {
    s.len() <= MAX_SYMBOL_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Values as the application sees them before encoding and after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Native {
    Void,
    Bool(bool),
    /// Any integer; range-checked against the declared type on encode
    Int(i128),
    /// Text, symbols, or addresses in strkey form
    String(String),
    Address(Address),
}

impl Native {
    fn kind(&self) -> &'static str {
        match self {
            Native::Void => "void",
            Native::Bool(_) => "bool",
            Native::Int(_) => "integer",
            Native::String(_) => "string",
            Native::Address(_) => "address",
        }
    }
}

macro_rules! impl_native_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Native {
                fn from(value: $ty) -> Self {
                    Native::Int(value as i128)
                }
            }
        )*
    };
}

impl_native_int!(u32, i32, u64, i64, i128);

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::String(value.to_owned())
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::String(value)
    }
}

impl From<Address> for Native {
    fn from(value: Address) -> Self {
        Native::Address(value)
    }
}

impl From<()> for Native {
    fn from(_: ()) -> Self {
        Native::Void
    }
}

fn narrow<T: TryFrom<i128>>(value: i128, ty: ValueType) -> Result<T, CodecError> {
    T::try_from(value).map_err(|_| CodecError::OutOfRange { value, ty })
}

/// Encodes a native value as the declared contract type.
///
/// ```rust
/// use sente_core::value::{encode, ContractValue, ValueType};
///
/// assert_eq!(encode(7u32.into(), ValueType::U32).unwrap(), ContractValue::U32(7));
/// assert!(encode((-1i64).into(), ValueType::U64).is_err());
/// ```
pub fn encode(value: Native, ty: ValueType) -> Result<ContractValue, CodecError> {
    let mismatch = |value: &Native| CodecError::TypeMismatch { expected: ty, found: value.kind() };
    Ok(match (value, ty) {
        (Native::Void, ValueType::Void) => ContractValue::Void,
        (Native::Bool(b), ValueType::Bool) => ContractValue::Bool(b),
        (Native::Int(i), ValueType::U32) => ContractValue::U32(narrow(i, ty)?),
        (Native::Int(i), ValueType::I32) => ContractValue::I32(narrow(i, ty)?),
        (Native::Int(i), ValueType::U64) => ContractValue::U64(narrow(i, ty)?),
        (Native::Int(i), ValueType::I64) => ContractValue::I64(narrow(i, ty)?),
        (Native::Int(i), ValueType::I128) => ContractValue::I128(i),
        (Native::String(s), ValueType::String) => ContractValue::String(s),
        (Native::String(s), ValueType::Symbol) => {
            if !is_valid_symbol(&s) {
                return Err(CodecError::InvalidSymbol(s))
            }
            ContractValue::Symbol(s)
        }
        (Native::String(s), ValueType::Address) => ContractValue::Address(s.parse()?),
        (Native::Address(a), ValueType::Address) => ContractValue::Address(a),
        (value, _) => return Err(mismatch(&value)),
    })
}

/// Decodes a contract value into its native form. Symbols decode to strings.
pub fn decode(value: ContractValue) -> Native {
    match value {
        ContractValue::Void => Native::Void,
        ContractValue::Bool(b) => Native::Bool(b),
        ContractValue::U32(n) => Native::Int(n.into()),
        ContractValue::I32(n) => Native::Int(n.into()),
        ContractValue::U64(n) => Native::Int(n.into()),
        ContractValue::I64(n) => Native::Int(n.into()),
        ContractValue::I128(n) => Native::Int(n),
        ContractValue::String(s) | ContractValue::Symbol(s) => Native::String(s),
        ContractValue::Address(a) => Native::Address(a),
    }
}
