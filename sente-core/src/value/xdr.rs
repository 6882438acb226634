use super::{codec::is_valid_symbol, CodecError, ContractValue};
use crate::types::{
    xdr::{from_base64, to_base64},
    Address,
};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use stellar_xdr::curr::{Int128Parts, ScString, ScSymbol, ScVal, StringM};

fn string_m<const MAX: u32>(s: &str) -> Result<StringM<MAX>, CodecError> {
    s.as_bytes()
        .to_vec()
        .try_into()
        .map_err(|_| CodecError::Malformed(format!("string of {} bytes is too long", s.len())))
}

fn utf8<const MAX: u32>(s: &StringM<MAX>) -> Result<String, CodecError> {
    s.to_utf8_string().map_err(|err| CodecError::Malformed(err.to_string()))
}

impl TryFrom<&ContractValue> for ScVal {
    type Error = CodecError;

    fn try_from(value: &ContractValue) -> Result<Self, CodecError> {
        Ok(match value {
            ContractValue::Void => ScVal::Void,
            ContractValue::Bool(b) => ScVal::Bool(*b),
            ContractValue::U32(n) => ScVal::U32(*n),
            ContractValue::I32(n) => ScVal::I32(*n),
            ContractValue::U64(n) => ScVal::U64(*n),
            ContractValue::I64(n) => ScVal::I64(*n),
            ContractValue::I128(n) => {
                ScVal::I128(Int128Parts { hi: (*n >> 64) as i64, lo: *n as u64 })
            }
            ContractValue::String(s) => ScVal::String(ScString(string_m(s)?)),
            ContractValue::Symbol(s) => {
                if !is_valid_symbol(s) {
                    return Err(CodecError::InvalidSymbol(s.clone()))
                }
                ScVal::Symbol(ScSymbol(string_m(s)?))
            }
            ContractValue::Address(address) => ScVal::Address(address.to_sc_address()),
        })
    }
}

impl TryFrom<ScVal> for ContractValue {
    type Error = CodecError;

    fn try_from(value: ScVal) -> Result<Self, Self::Error> {
        Ok(match value {
            ScVal::Void => ContractValue::Void,
            ScVal::Bool(b) => ContractValue::Bool(b),
            ScVal::U32(n) => ContractValue::U32(n),
            ScVal::I32(n) => ContractValue::I32(n),
            ScVal::U64(n) => ContractValue::U64(n),
            ScVal::I64(n) => ContractValue::I64(n),
            ScVal::I128(Int128Parts { hi, lo }) => {
                ContractValue::I128(((hi as i128) << 64) | lo as i128)
            }
            ScVal::String(ScString(s)) => ContractValue::String(utf8(&s)?),
            ScVal::Symbol(ScSymbol(s)) => ContractValue::Symbol(utf8(&s)?),
            ScVal::Address(address) => ContractValue::Address(Address::from(&address)),
            other => return Err(CodecError::UnsupportedType(other.name().to_lowercase())),
        })
    }
}

impl ContractValue {
    /// The value as a base64 `ScVal`
    pub fn to_xdr_base64(&self) -> Result<String, CodecError> {
        let val = ScVal::try_from(self)?;
        to_base64(&val).map_err(|err| CodecError::Malformed(err.to_string()))
    }

    /// Decodes a base64 `ScVal`, rejecting types outside [`ContractValue`].
    pub fn from_xdr_base64(encoded: &str) -> Result<Self, CodecError> {
        let val: ScVal = from_base64(encoded).map_err(|err| CodecError::Malformed(err.to_string()))?;
        val.try_into()
    }
}

impl Serialize for ContractValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_xdr_base64().map_err(ser::Error::custom)?)
    }
}

impl<'de> Deserialize<'de> for ContractValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        ContractValue::from_xdr_base64(&encoded).map_err(de::Error::custom)
    }
}
