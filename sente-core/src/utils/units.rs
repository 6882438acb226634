use super::ConversionError;

/// Decimals of the Sente token
pub const DEFAULT_DECIMALS: u32 = 6;

fn scale(decimals: u32) -> Result<u128, ConversionError> {
    10u128.checked_pow(decimals).filter(|s| *s <= i128::MAX as u128).ok_or(ConversionError::TooManyDecimals(decimals))
}

/// Formats an integer amount in the smallest unit as a decimal string.
///
/// ```rust
/// use sente_core::utils::format_amount;
///
/// assert_eq!(format_amount(12_500_000, 6).unwrap(), "12.500000");
/// assert_eq!(format_amount(-1, 2).unwrap(), "-0.01");
/// assert_eq!(format_amount(42, 0).unwrap(), "42");
/// ```
pub fn format_amount(amount: i128, decimals: u32) -> Result<String, ConversionError> {
    let scale = scale(decimals)?;
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let (int, frac) = (abs / scale, abs % scale);
    if decimals == 0 {
        return Ok(format!("{sign}{int}"))
    }
    Ok(format!("{sign}{int}.{frac:0width$}", width = decimals as usize))
}

/// Parses a decimal amount into its smallest unit. Fractional digits beyond
/// `decimals` are truncated, never rounded.
///
/// ```rust
/// use sente_core::utils::parse_amount;
///
/// assert_eq!(parse_amount("12.5", 6).unwrap(), 12_500_000);
/// assert_eq!(parse_amount(0.1234567, 6).unwrap(), 123_456);
/// ```
pub fn parse_amount<S: ToString>(amount: S, decimals: u32) -> Result<i128, ConversionError> {
    let raw = amount.to_string();
    let input = raw.trim();
    let invalid = || ConversionError::InvalidAmount(raw.clone());
    let overflow = || ConversionError::Overflow(raw.clone());
    let scale = scale(decimals)? as i128;

    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (unsigned, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(invalid())
    }

    let int: i128 = if int_part.is_empty() { 0 } else { int_part.parse().map_err(|_| overflow())? };
    let kept = &frac_part[..frac_part.len().min(decimals as usize)];
    let frac: i128 = if kept.is_empty() {
        0
    } else {
        let digits: i128 = kept.parse().map_err(|_| overflow())?;
        digits * 10i128.pow(decimals - kept.len() as u32)
    };

    let value = int.checked_mul(scale).and_then(|v| v.checked_add(frac)).ok_or_else(overflow)?;
    Ok(if negative { -value } else { value })
}

/// Shortens an address for display: the first and last four characters.
///
/// ```rust
/// use sente_core::utils::format_address;
///
/// assert_eq!(format_address("GABCDEFGHIJKLMNOPWXYZ"), "GABC...WXYZ");
/// assert_eq!(format_address(""), "");
/// ```
pub fn format_address(address: &str) -> String {
    if address.len() <= 8 || !address.is_ascii() {
        return address.to_owned()
    }
    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}
