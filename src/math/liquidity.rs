// Liquidity <-> token amounts for a single range position (LiquidityAmounts.sol).
// Every product is formed before its division; all quotients round down.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::error::MathError;
use crate::math::tick_math::{max_usable_tick, min_usable_tick, q96, sqrt_price_at_tick};

const BPS_DENOMINATOR: u32 = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenAmounts {
    pub amount0: BigInt,
    pub amount1: BigInt,
}

/// Everything a full-range mint instruction needs besides the pool key and recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintPlan {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: BigInt,
    pub amount0_max: BigInt,
    pub amount1_max: BigInt,
}

#[inline]
pub fn mul_div(a: &BigInt, b: &BigInt, denominator: &BigInt) -> Result<BigInt, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok((a * b) / denominator)
}

#[inline]
fn non_negative(value: &BigInt, what: &'static str) -> Result<(), MathError> {
    if value.is_negative() {
        return Err(MathError::NegativeValue(what));
    }
    Ok(())
}

/// Bounds in ascending order; both must be non-negative sqrt prices.
#[inline]
fn checked_bounds<'a>(a: &'a BigInt, b: &'a BigInt) -> Result<(&'a BigInt, &'a BigInt), MathError> {
    non_negative(a, "sqrt price")?;
    non_negative(b, "sqrt price")?;
    Ok(ordered(a, b))
}

#[inline]
fn ordered<'a>(a: &'a BigInt, b: &'a BigInt) -> (&'a BigInt, &'a BigInt) {
    if a > b { (b, a) } else { (a, b) }
}

/// L = amount0 * (sa * sb / Q96) / (sb - sa)
pub fn liquidity_for_amount0(
    sqrt_price_a_x96: &BigInt,
    sqrt_price_b_x96: &BigInt,
    amount0: &BigInt,
) -> Result<BigInt, MathError> {
    non_negative(amount0, "amount0")?;
    let (sa, sb) = checked_bounds(sqrt_price_a_x96, sqrt_price_b_x96)?;
    let intermediate = mul_div(sa, sb, &q96())?;
    mul_div(amount0, &intermediate, &(sb - sa))
}

/// L = amount1 * Q96 / (sb - sa)
pub fn liquidity_for_amount1(
    sqrt_price_a_x96: &BigInt,
    sqrt_price_b_x96: &BigInt,
    amount1: &BigInt,
) -> Result<BigInt, MathError> {
    non_negative(amount1, "amount1")?;
    let (sa, sb) = checked_bounds(sqrt_price_a_x96, sqrt_price_b_x96)?;
    mul_div(amount1, &q96(), &(sb - sa))
}

/// Largest liquidity the deposit supports. Below the range only token0 counts,
/// above it only token1, inside it the smaller of the two single-side results.
pub fn liquidity_for_amounts(
    sqrt_price_x96: &BigInt,
    sqrt_price_a_x96: &BigInt,
    sqrt_price_b_x96: &BigInt,
    amount0: &BigInt,
    amount1: &BigInt,
) -> Result<BigInt, MathError> {
    non_negative(sqrt_price_x96, "sqrt price")?;
    non_negative(amount0, "amount0")?;
    non_negative(amount1, "amount1")?;
    let (sa, sb) = checked_bounds(sqrt_price_a_x96, sqrt_price_b_x96)?;

    if sqrt_price_x96 <= sa {
        return liquidity_for_amount0(sa, sb, amount0);
    }
    if sqrt_price_x96 < sb {
        let liquidity0 = liquidity_for_amount0(sqrt_price_x96, sb, amount0)?;
        let liquidity1 = liquidity_for_amount1(sa, sqrt_price_x96, amount1)?;
        return Ok(liquidity0.min(liquidity1));
    }
    liquidity_for_amount1(sa, sb, amount1)
}

/// amount0 = ((L << 96) * (sb - sa) / sb) / sa
pub fn amount0_for_liquidity(
    sqrt_price_a_x96: &BigInt,
    sqrt_price_b_x96: &BigInt,
    liquidity: &BigInt,
) -> Result<BigInt, MathError> {
    non_negative(liquidity, "liquidity")?;
    let (sa, sb) = checked_bounds(sqrt_price_a_x96, sqrt_price_b_x96)?;
    if sa.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok(mul_div(&(liquidity << 96), &(sb - sa), sb)? / sa)
}

/// amount1 = L * (sb - sa) / Q96
pub fn amount1_for_liquidity(
    sqrt_price_a_x96: &BigInt,
    sqrt_price_b_x96: &BigInt,
    liquidity: &BigInt,
) -> Result<BigInt, MathError> {
    non_negative(liquidity, "liquidity")?;
    let (sa, sb) = checked_bounds(sqrt_price_a_x96, sqrt_price_b_x96)?;
    mul_div(liquidity, &(sb - sa), &q96())
}

pub fn amounts_for_liquidity(
    sqrt_price_x96: &BigInt,
    sqrt_price_a_x96: &BigInt,
    sqrt_price_b_x96: &BigInt,
    liquidity: &BigInt,
) -> Result<TokenAmounts, MathError> {
    non_negative(sqrt_price_x96, "sqrt price")?;
    non_negative(liquidity, "liquidity")?;
    let (sa, sb) = checked_bounds(sqrt_price_a_x96, sqrt_price_b_x96)?;

    if sqrt_price_x96 <= sa {
        return Ok(TokenAmounts {
            amount0: amount0_for_liquidity(sa, sb, liquidity)?,
            amount1: BigInt::zero(),
        });
    }
    if sqrt_price_x96 < sb {
        return Ok(TokenAmounts {
            amount0: amount0_for_liquidity(sqrt_price_x96, sb, liquidity)?,
            amount1: amount1_for_liquidity(sa, sqrt_price_x96, liquidity)?,
        });
    }
    Ok(TokenAmounts {
        amount0: BigInt::zero(),
        amount1: amount1_for_liquidity(sa, sb, liquidity)?,
    })
}

/// amount * (10_000 + slippage_bps) / 10_000, computed without a u32 intermediate.
pub fn amount_max_with_slippage(amount: &BigInt, slippage_bps: u32) -> Result<BigInt, MathError> {
    non_negative(amount, "amount")?;
    let numerator = BigInt::from(BPS_DENOMINATOR) + BigInt::from(slippage_bps);
    Ok(amount * numerator / BigInt::from(BPS_DENOMINATOR))
}

/// Full-range position at the current pool price: usable tick bounds for the
/// spacing, the liquidity the amounts support, and slippage-padded maxima.
pub fn full_range_position(
    sqrt_price_x96: &BigInt,
    tick_spacing: i32,
    amount0: &BigInt,
    amount1: &BigInt,
    slippage_bps: u32,
) -> Result<MintPlan, MathError> {
    let tick_lower = min_usable_tick(tick_spacing);
    let tick_upper = max_usable_tick(tick_spacing);
    let sqrt_lower = sqrt_price_at_tick(tick_lower)?;
    let sqrt_upper = sqrt_price_at_tick(tick_upper)?;

    let liquidity = liquidity_for_amounts(sqrt_price_x96, &sqrt_lower, &sqrt_upper, amount0, amount1)?;
    log::debug!(
        "full range [{}, {}] liquidity {} for amounts ({}, {})",
        tick_lower, tick_upper, liquidity, amount0, amount1
    );

    Ok(MintPlan {
        tick_lower,
        tick_upper,
        liquidity,
        amount0_max: amount_max_with_slippage(amount0, slippage_bps)?,
        amount1_max: amount_max_with_slippage(amount1, slippage_bps)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(tick: i32) -> BigInt {
        sqrt_price_at_tick(tick).unwrap()
    }

    fn units(v: u128) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn below_range_uses_token0_only() {
        let (a, b) = (sp(-600), sp(600));
        let l = liquidity_for_amounts(&sp(-1200), &a, &b, &units(1_000_000), &units(0)).unwrap();
        assert_eq!(l, liquidity_for_amount0(&a, &b, &units(1_000_000)).unwrap());
        let amounts = amounts_for_liquidity(&sp(-1200), &a, &b, &l).unwrap();
        assert!(amounts.amount1.is_zero());
        assert!(amounts.amount0 <= units(1_000_000));
    }

    #[test]
    fn above_range_uses_token1_only() {
        let (a, b) = (sp(-600), sp(600));
        let l = liquidity_for_amounts(&sp(1200), &a, &b, &units(0), &units(5_000_000)).unwrap();
        assert_eq!(l, liquidity_for_amount1(&a, &b, &units(5_000_000)).unwrap());
        let amounts = amounts_for_liquidity(&sp(1200), &a, &b, &l).unwrap();
        assert!(amounts.amount0.is_zero());
        assert!(amounts.amount1 <= units(5_000_000));
    }

    #[test]
    fn in_range_takes_binding_side() {
        let (a, b, p) = (sp(-600), sp(600), sp(0));
        let a0 = units(10u128.pow(18));
        let a1 = units(5 * 10u128.pow(17));
        let l = liquidity_for_amounts(&p, &a, &b, &a0, &a1).unwrap();
        let l0 = liquidity_for_amount0(&p, &b, &a0).unwrap();
        let l1 = liquidity_for_amount1(&a, &p, &a1).unwrap();
        assert_eq!(l, l0.clone().min(l1.clone()));
        assert_eq!(l, l1);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let (a, b, p) = (sp(-600), sp(600), sp(10));
        let x = liquidity_for_amounts(&p, &a, &b, &units(777_777), &units(888_888)).unwrap();
        let y = liquidity_for_amounts(&p, &b, &a, &units(777_777), &units(888_888)).unwrap();
        assert_eq!(x, y);
        assert_eq!(
            amounts_for_liquidity(&p, &a, &b, &x).unwrap(),
            amounts_for_liquidity(&p, &b, &a, &x).unwrap()
        );
    }

    #[test]
    fn round_trip_never_exceeds_deposit() {
        let cases = [
            (-60, -600, 600, 123_456_789u128, 987_654_321u128),
            (0, -887_220, 887_220, 10u128.pow(24), 3 * 10u128.pow(21)),
            (46_000, 40_000, 50_000, 10u128.pow(18), 10u128.pow(30)),
            (-1200, -600, 600, 5, 5),
        ];
        for (tick, lo, hi, a0, a1) in cases {
            let (p, a, b) = (sp(tick), sp(lo), sp(hi));
            let l = liquidity_for_amounts(&p, &a, &b, &units(a0), &units(a1)).unwrap();
            let back = amounts_for_liquidity(&p, &a, &b, &l).unwrap();
            assert!(back.amount0 <= units(a0), "tick {} amount0 {}", tick, back.amount0);
            assert!(back.amount1 <= units(a1), "tick {} amount1 {}", tick, back.amount1);
        }
    }

    #[test]
    fn amounts_beyond_64_bits_are_supported() {
        let huge = BigInt::from(u128::MAX) << 100;
        let (a, b) = (sp(-600), sp(600));
        let l = liquidity_for_amounts(&sp(0), &a, &b, &huge, &huge).unwrap();
        assert!(l > BigInt::from(u128::MAX));
    }

    #[test]
    fn degenerate_range_is_division_by_zero() {
        let a = sp(60);
        assert_eq!(
            liquidity_for_amounts(&sp(0), &a, &a, &units(1), &units(1)),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            amount0_for_liquidity(&BigInt::zero(), &a, &units(1)),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(mul_div(&units(1), &units(1), &BigInt::zero()), Err(MathError::DivisionByZero));
    }

    #[test]
    fn mul_div_multiplies_before_dividing() {
        let a = BigInt::from(u128::MAX);
        assert_eq!(mul_div(&a, &a, &a).unwrap(), a);
    }

    #[test]
    fn slippage_padding_does_not_overflow() {
        let amount = units(1000);
        assert_eq!(amount_max_with_slippage(&amount, 50).unwrap(), units(1005));
        assert_eq!(amount_max_with_slippage(&amount, 0).unwrap(), amount);
        // (10_000 + u32::MAX) * 1000 / 10_000
        let widest = amount_max_with_slippage(&amount, u32::MAX).unwrap();
        assert_eq!(widest, units(429_497_729));
        let plan = full_range_position(&q96(), 60, &amount, &amount, u32::MAX).unwrap();
        assert_eq!(plan.amount0_max, widest);
    }

    #[test]
    fn negative_inputs_are_rejected() {
        let (a, b, p) = (sp(-600), sp(600), sp(0));
        let neg = units(1_000_000) * -1;
        assert_eq!(
            liquidity_for_amounts(&p, &a, &b, &neg, &units(0)),
            Err(MathError::NegativeValue("amount0"))
        );
        assert_eq!(
            liquidity_for_amounts(&p, &a, &b, &units(0), &neg),
            Err(MathError::NegativeValue("amount1"))
        );
        assert_eq!(
            liquidity_for_amounts(&-p.clone(), &a, &b, &units(1), &units(1)),
            Err(MathError::NegativeValue("sqrt price"))
        );
        assert_eq!(
            liquidity_for_amount0(&-a.clone(), &b, &units(1)),
            Err(MathError::NegativeValue("sqrt price"))
        );
        assert_eq!(
            amounts_for_liquidity(&p, &a, &b, &neg),
            Err(MathError::NegativeValue("liquidity"))
        );
        assert_eq!(
            amount1_for_liquidity(&a, &b, &neg),
            Err(MathError::NegativeValue("liquidity"))
        );
        assert_eq!(amount_max_with_slippage(&neg, 50), Err(MathError::NegativeValue("amount")));
    }

    #[test]
    fn full_range_plan_for_one_to_one_pool() {
        let amount = units(10u128.pow(18));
        let plan = full_range_position(&q96(), 60, &amount, &amount, 50).unwrap();
        assert_eq!(plan.tick_lower, -887_220);
        assert_eq!(plan.tick_upper, 887_220);
        // at price 1 a balanced full-range deposit yields L ~= amount
        assert!(plan.liquidity <= amount);
        assert!(plan.liquidity > &amount * 999 / 1000);
        assert_eq!(plan.amount0_max, units(1_005_000_000_000_000_000));
        assert_eq!(plan.amount1_max, plan.amount0_max);
    }
}
