mod units;
pub use units::{format_address, format_amount, parse_amount, DEFAULT_DECIMALS};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("amount `{0}` overflows i128")]
    Overflow(String),
    #[error("{0} decimals cannot be represented")]
    TooManyDecimals(u32),
}
