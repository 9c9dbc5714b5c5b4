use num_bigint::BigInt;
use num_traits::Zero;

use crate::error::MathError;

/// Decimal token string -> raw integer units, e.g. "1.5" with 6 decimals -> 1_500_000.
/// Digits beyond `decimals` are rounded half up. Empty input is zero.
pub fn parse_units(amount: &str, decimals: u8) -> Result<BigInt, MathError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Ok(BigInt::zero());
    }
    let invalid = || MathError::InvalidAmount(trimmed.to_string());

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let decimals = decimals as usize;
    let (kept, dropped) = if fraction.len() > decimals {
        fraction.split_at(decimals)
    } else {
        (fraction, "")
    };

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(kept);
    for _ in kept.len()..decimals {
        digits.push('0');
    }
    if digits.is_empty() {
        digits.push('0');
    }

    let mut value = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        value += 1u8;
    }
    Ok(value)
}
