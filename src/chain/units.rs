//! Decimal amount scaling between human units and raw base units.
//!
//! All on-chain amounts are raw integers; all user-facing amounts are decimal
//! strings. Conversion is exact integer scaling - floats never touch values
//! that end up inside a transaction.

use alloy::primitives::U256;

use crate::error::{PipelineError, PipelineResult};

/// Decimals of the native token.
pub const NATIVE_DECIMALS: u8 = 18;

/// Convert a human-readable decimal string into raw base units.
///
/// Accepts plain decimal notation (`"2.5"`, `"100"`, `".5"`). Fails on empty
/// input, signs, exponents, or more fractional digits than the token carries.
pub fn to_base_units(amount: &str, decimals: u8) -> PipelineResult<U256> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(PipelineError::Validation("amount must not be empty".to_string()));
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(PipelineError::Validation(format!("invalid amount '{amount}'")));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(PipelineError::Validation(format!("invalid amount '{amount}'")));
    }
    if frac_part.len() > decimals as usize {
        return Err(PipelineError::Validation(format!(
            "amount '{amount}' has more than {decimals} decimal places"
        )));
    }

    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in 0..(decimals as usize - frac_part.len()) {
        digits.push('0');
    }
    if digits.is_empty() {
        digits.push('0');
    }

    U256::from_str_radix(&digits, 10)
        .map_err(|_| PipelineError::Validation(format!("amount '{amount}' is too large")))
}

/// Format raw base units as a human-readable decimal string.
///
/// Trailing fractional zeros are trimmed; whole values render without a
/// decimal point.
pub fn format_base_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let (int_part, frac_part) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };

    let frac_trimmed = frac_part.trim_end_matches('0');
    if frac_trimmed.is_empty() {
        int_part
    } else {
        format!("{int_part}.{frac_trimmed}")
    }
}
