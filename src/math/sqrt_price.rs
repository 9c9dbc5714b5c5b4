// Human price <-> Q64.96 sqrt price. Integer-only except for the Decimal used to
// parse and display human-readable prices.

use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;

use crate::error::MathError;

/// Human prices are floored to 12 fractional digits before encoding.
const PRICE_SCALE_DIGITS: u32 = 12;
const DISPLAY_SCALE_DIGITS: u32 = 18;

#[inline]
fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// floor(sqrt(value)) by Newton's method. 0 and 1 are returned unchanged.
pub fn integer_sqrt(value: &BigInt) -> Result<BigInt, MathError> {
    if value.is_negative() {
        return Err(MathError::NegativeSquareRoot);
    }
    if *value < BigInt::from(2u8) {
        return Ok(value.clone());
    }

    let mut x0: BigInt = value >> 1;
    let mut x1: BigInt = (&x0 + value / &x0) >> 1;
    while x1 < x0 {
        x0 = x1;
        x1 = (&x0 + value / &x0) >> 1;
    }
    Ok(x0)
}

/// sqrt(amount1 / amount0) as Q64.96: isqrt((amount1 << 192) / amount0).
pub fn encode_sqrt_price_x96(amount1: &BigInt, amount0: &BigInt) -> Result<BigInt, MathError> {
    if amount0.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let ratio_x192 = (amount1 << 192) / amount0;
    integer_sqrt(&ratio_x192)
}

fn parse_price(price: &str) -> Result<Decimal, MathError> {
    let trimmed = price.trim();
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    }
    .map_err(|_| MathError::InvalidPrice(trimmed.to_string()))?;

    if parsed <= Decimal::ZERO {
        return Err(MathError::InvalidPrice(trimmed.to_string()));
    }
    Ok(parsed)
}

/// floor(price * 10^12) as an integer numerator over 10^12.
fn scaled_price_numerator(price: &str) -> Result<BigInt, MathError> {
    let parsed = parse_price(price)?;
    let scaled = parsed
        .checked_mul(Decimal::from(10i64.pow(PRICE_SCALE_DIGITS)))
        .ok_or(MathError::PriceOutOfRange)?
        .floor();
    let numerator = scaled.to_i128().ok_or(MathError::PriceOutOfRange)?;
    if numerator == 0 {
        // below the 1e-12 resolution the pool would be initialised at sqrt price zero
        return Err(MathError::InvalidPrice(price.trim().to_string()));
    }
    Ok(BigInt::from(numerator))
}

/// Initial sqrt price for a human price quoted as token1 per token0 in raw units.
pub fn price_to_sqrt_price_x96(price: &str) -> Result<BigInt, MathError> {
    let numerator = scaled_price_numerator(price)?;
    encode_sqrt_price_x96(&numerator, &pow10(PRICE_SCALE_DIGITS))
}

/// Same as [`price_to_sqrt_price_x96`] with the price quoted in whole tokens, so
/// 3000 USDC per WETH becomes 3000 * 10^6 / 10^18 in raw units.
pub fn price_to_sqrt_price_x96_with_decimals(
    price: &str,
    token0_decimals: u8,
    token1_decimals: u8,
) -> Result<BigInt, MathError> {
    let numerator = scaled_price_numerator(price)?;
    let amount1 = numerator * pow10(token1_decimals as u32);
    let amount0 = pow10(PRICE_SCALE_DIGITS) * pow10(token0_decimals as u32);
    encode_sqrt_price_x96(&amount1, &amount0)
}

/// Human price (token1 per token0, whole tokens) for a sqrt price, floored to at
/// most 18 fractional digits; fewer when the value would not fit a Decimal.
pub fn price_at_sqrt_price(
    sqrt_price_x96: &BigInt,
    token0_decimals: u8,
    token1_decimals: u8,
) -> Result<Decimal, MathError> {
    if sqrt_price_x96.is_negative() {
        return Err(MathError::SqrtPriceOutOfRange);
    }
    let numerator = sqrt_price_x96 * sqrt_price_x96 * pow10(token0_decimals as u32);
    let denominator = (BigInt::one() << 192) * pow10(token1_decimals as u32);

    for scale in (0..=DISPLAY_SCALE_DIGITS).rev() {
        let q = (&numerator * pow10(scale)).div_floor(&denominator);
        if let Some(mantissa) = q.to_i128() {
            if let Ok(price) = Decimal::try_from_i128_with_scale(mantissa, scale) {
                return Ok(price.normalize());
            }
        }
    }
    Err(MathError::PriceOutOfRange)
}
