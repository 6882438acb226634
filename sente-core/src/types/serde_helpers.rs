//! Some convenient serde helpers

use serde::{Deserialize, Deserializer, Serializer};
use std::{fmt::Display, str::FromStr};

/// Helper type to parse both numeric strings and plain JSON numbers
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum StringifiedNumeric {
    String(String),
    Num(serde_json::Number),
}

impl StringifiedNumeric {
    pub fn parse<T>(&self) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self {
            StringifiedNumeric::String(s) => s.trim().parse().map_err(|err: T::Err| err.to_string()),
            StringifiedNumeric::Num(n) => n.to_string().parse().map_err(|err: T::Err| err.to_string()),
        }
    }
}

/// (De)serializes integers as decimal strings, which is how the RPC endpoints
/// transport 64 and 128 bit values. Deserialization also accepts plain numbers.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Fee {
///     #[serde(with = "sente_core::types::serde_helpers::stringified")]
///     resource_fee: u64,
/// }
///
/// let fee: Fee = serde_json::from_str(r#"{"resource_fee":"5000"}"#).unwrap();
/// assert_eq!(fee.resource_fee, 5000);
/// assert_eq!(serde_json::to_string(&fee).unwrap(), r#"{"resource_fee":"5000"}"#);
/// ```
pub mod stringified {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        StringifiedNumeric::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
    }
}

/// Same as [`stringified`] for optional values; `null` and missing fields map to `None`.
pub mod stringified_opt {
    use super::*;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        match Option::<StringifiedNumeric>::deserialize(deserializer)? {
            Some(num) => num.parse().map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
