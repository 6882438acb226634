//! Base64 XDR, the encoding the endpoints and signers exchange
use base64::{engine::general_purpose::STANDARD, Engine};
use stellar_xdr::curr::{Limits, ReadXdr, WriteXdr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XdrError {
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error("invalid xdr: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),
}

/// Encodes an XDR value as base64
pub fn to_base64<T: WriteXdr>(value: &T) -> Result<String, XdrError> {
    Ok(STANDARD.encode(value.to_xdr(Limits::none())?))
}

/// Decodes a base64 XDR value. Trailing bytes are an error.
pub fn from_base64<T: ReadXdr>(encoded: &str) -> Result<T, XdrError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(T::from_xdr(bytes, Limits::none())?)
}

/// (De)serializes an XDR value as a base64 string, the way the execution
/// endpoint sends `transactionData`, `resultXdr` and friends.
pub mod base64_xdr {
    use super::*;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: WriteXdr,
        S: Serializer,
    {
        serializer.serialize_str(&to_base64(value).map_err(ser::Error::custom)?)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: ReadXdr,
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        from_base64(&encoded).map_err(de::Error::custom)
    }
}

/// Same as [`base64_xdr`] for optional fields; missing fields and `null` map to `None`.
pub mod base64_xdr_opt {
    use super::*;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: WriteXdr,
        S: Serializer,
    {
        match value {
            Some(value) => {
                serializer.serialize_str(&to_base64(value).map_err(ser::Error::custom)?)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: ReadXdr,
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => from_base64(&encoded).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

/// A list of base64 XDR values, e.g. the authorization entries of a simulation
pub mod base64_xdr_seq {
    use super::*;
    use serde::{de, ser, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: WriteXdr,
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&to_base64(value).map_err(ser::Error::custom)?)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: ReadXdr,
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|encoded| from_base64(encoded).map_err(de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_xdr::curr::ScVal;

    #[test]
    fn known_encodings() {
        assert_eq!(to_base64(&ScVal::U32(7)).unwrap(), "AAAAAwAAAAc=");
        assert_eq!(to_base64(&ScVal::Void).unwrap(), "AAAAAQ==");
        assert_eq!(from_base64::<ScVal>("AAAAAAAAAAE=").unwrap(), ScVal::Bool(true));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(from_base64::<ScVal>("not base64!"), Err(XdrError::Base64(_))));
        // a u32 with a trailing word
        assert!(matches!(from_base64::<ScVal>("AAAAAwAAAAcAAAAA"), Err(XdrError::Xdr(_))));
    }
}
