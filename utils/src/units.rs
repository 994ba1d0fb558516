//! Fixed-point literal helpers.
//!
//! Strategy tables are written with scientific literals such as `2000e18`
//! or `1.5e3`; these helpers turn them into exact integers.

use alloy::primitives::U256;
use anyhow::{anyhow, bail, Result};

/// Returns `mantissa * 10^exponent`, failing on overflow.
pub fn scaled(mantissa: u64, exponent: u32) -> Result<U256> {
    let factor = U256::from(10u64)
        .checked_pow(U256::from(exponent))
        .ok_or_else(|| anyhow!("10^{} overflows uint256", exponent))?;
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or_else(|| anyhow!("{}e{} overflows uint256", mantissa, exponent))
}

/// Parses a literal like `100_000_000e8`, `1.5e3` or `2000` into an integer.
///
/// Negative values and values with a non-zero fractional part are rejected.
pub fn parse_scaled(literal: &str) -> Result<U256> {
    let cleaned: String = literal.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        bail!("empty numeric literal");
    }
    if cleaned.starts_with('-') {
        bail!("negative literal not allowed: {}", literal);
    }

    let (mantissa, exponent) = match cleaned.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => {
            let exp = cleaned[pos + 1..]
                .trim_start_matches('+')
                .parse::<i64>()
                .map_err(|e| anyhow!("invalid exponent in {}: {}", literal, e))?;
            (&cleaned[..pos], exp)
        }
        None => (cleaned.as_str(), 0),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((w, f)) => (w, f),
        None => (mantissa, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        bail!("missing mantissa in {}", literal);
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        bail!("invalid digits in {}", literal);
    }

    let mut digits = format!("{}{}", whole, fraction);
    let mut shift = i64::try_from(fraction.len())
        .ok()
        .and_then(|len| exponent.checked_sub(len))
        .ok_or_else(|| anyhow!("exponent out of range in {}", literal))?;
    if shift < 0 {
        let drop = shift
            .checked_neg()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| anyhow!("exponent out of range in {}", literal))?;
        let cut = digits.len().saturating_sub(drop);
        if digits[cut..].chars().any(|c| c != '0') {
            bail!("literal {} is not an integer", literal);
        }
        digits.truncate(cut);
        shift = 0;
    }
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    let base = U256::from_str_radix(&digits, 10)
        .map_err(|e| anyhow!("invalid literal {}: {}", literal, e))?;
    let factor = U256::from(10u64)
        .checked_pow(U256::from(shift as u64))
        .ok_or_else(|| anyhow!("{} overflows uint256", literal))?;
    base.checked_mul(factor)
        .ok_or_else(|| anyhow!("{} overflows uint256", literal))
}

/// Converts a U256 value to f64, accounting for token decimals.
///
/// Values larger than `u128::MAX` saturate; this is acceptable for f64 precision.
pub fn u256_to_f64(value: U256, decimals: u32) -> f64 {
    let value_u128 = value.saturating_to::<u128>();
    match 10_u128.checked_pow(decimals) {
        Some(divisor) => {
            let whole_part = value_u128 / divisor;
            let fractional_part = value_u128 % divisor;
            whole_part as f64 + (fractional_part as f64 / divisor as f64)
        }
        // beyond 38 decimals any u128 value is below one unit
        None => value_u128 as f64 / 10f64.powi(decimals.min(i32::MAX as u32) as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_literals() {
        assert_eq!(scaled(2000, 18).unwrap(), U256::from(2000u64) * U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(scaled(100_000_000, 8).unwrap(), U256::from(10_000_000_000_000_000u64));
        assert!(scaled(u64::MAX, 77).is_err());
    }

    #[test]
    fn parse_scientific_literals() {
        assert_eq!(parse_scaled("1.5e3").unwrap(), U256::from(1500u64));
        assert_eq!(parse_scaled("100_000_000e8").unwrap(), U256::from(10_000_000_000_000_000u64));
        assert_eq!(parse_scaled("3e6").unwrap(), U256::from(3_000_000u64));
        assert_eq!(parse_scaled("9975").unwrap(), U256::from(9975u64));
        assert_eq!(parse_scaled("2.50e1").unwrap(), U256::from(25u64));
        assert_eq!(parse_scaled("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn parse_rejects_bad_literals() {
        assert!(parse_scaled("").is_err());
        assert!(parse_scaled("-1e3").is_err());
        assert!(parse_scaled("1.25e1").is_err());
        assert!(parse_scaled("12a").is_err());
        assert!(parse_scaled("1e").is_err());
        assert!(parse_scaled("1e-9223372036854775808").is_err());
        assert!(parse_scaled("1.5e-9223372036854775808").is_err());
        assert!(parse_scaled("1e9223372036854775807").is_err());
        assert!(parse_scaled("1e99999999999999999999").is_err());
    }

    #[test]
    fn u256_to_f64_respects_decimals() {
        let one_and_half = U256::from(1_500_000u64);
        assert!((u256_to_f64(one_and_half, 6) - 1.5).abs() < 1e-12);
        assert_eq!(u256_to_f64(U256::ZERO, 18), 0.0);
        assert!(u256_to_f64(U256::from(1u64), 39) < 1e-38);
        assert_eq!(u256_to_f64(U256::from(5u64), u32::MAX), 0.0);
    }
}
