//! Decimal conversions between raw on-chain integers and display amounts

use alloy::primitives::U256;

use crate::error::{Error, Result};

/// Decimals of every EVM native currency (1 ether = 1e18 wei).
pub const NATIVE_DECIMALS: u32 = 18;

/// Format a raw `U256` amount as a decimal string, shifting the point
/// `decimals` places. Trailing zeros on the fractional part are trimmed.
pub fn format_units(value: U256, decimals: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let remainder_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = remainder_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

/// Format a wei amount in native currency units.
pub fn format_ether(value: U256) -> String {
    format_units(value, NATIVE_DECIMALS)
}

/// Parse a decimal string into a raw `U256`, shifting the point `decimals`
/// places. Rejects amounts with more fractional digits than `decimals`.
pub fn parse_units(text: &str, decimals: u32) -> Result<U256> {
    let text = text.trim();
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(Error::InvalidAmount(text.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(Error::InvalidAmount(format!(
            "{text} has more than {decimals} fractional digits"
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(if whole.is_empty() { "0" } else { whole });
    digits.push_str(frac);
    for _ in 0..(decimals as usize - frac.len()) {
        digits.push('0');
    }

    digits
        .parse::<U256>()
        .map_err(|_| Error::InvalidAmount(text.to_string()))
}

/// Parse a native currency amount into wei.
pub fn parse_ether(text: &str) -> Result<U256> {
    parse_units(text, NATIVE_DECIMALS)
}
