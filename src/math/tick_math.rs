// Tick <-> sqrt-price conversions (Q64.96), bit-exact with TickMath.sol.

use num_bigint::{BigInt, Sign};
use num_traits::One;

use crate::error::MathError;

pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;

// 1461446703485210103287273052203988822378723970342
const MAX_SQRT_RATIO_BYTES: [u8; 20] = [
    0xff, 0xfd, 0x89, 0x63, 0xef, 0xd1, 0xfc, 0x6a, 0x50, 0x64,
    0x88, 0x49, 0x5d, 0x95, 0x1d, 0x52, 0x63, 0x98, 0x8d, 0x26,
];

/// 1.0001^(-2^i / 2) in Q128.128, for bits 1..=19 of |tick|.
const RATIO_MULTIPLIERS: [(u32, u128); 19] = [
    (0x2, 0xfff97272373d413259a46990580e213a),
    (0x4, 0xfff2e50f5f656932ef12357cf3c7fdcc),
    (0x8, 0xffe5caca7e10e4e61c3624eaa0941cd0),
    (0x10, 0xffcb9843d60f6159c9db58835c926644),
    (0x20, 0xff973b41fa98c081472e6896dfb254c0),
    (0x40, 0xff2ea16466c96a3843ec78b326b52861),
    (0x80, 0xfe5dee046a99a2a811c461f1969c3053),
    (0x100, 0xfcbe86c7900a88aedcffc83b479aa3a4),
    (0x200, 0xf987a7253ac413176f2b074cf7815e54),
    (0x400, 0xf3392b0822b70005940c7a398e4b70f3),
    (0x800, 0xe7159475a2c29b7443b29c7fa6e889d9),
    (0x1000, 0xd097f3bdfd2022b8845ad8f792aa5825),
    (0x2000, 0xa9f746462d870fdf8a65dc1f90e061e5),
    (0x4000, 0x70d869a156d2a1b890bb3df62baf32f7),
    (0x8000, 0x31be135f97d08fd981231505542fcfa6),
    (0x10000, 0x9aa508b5b7a84e1c677de54f3e99bc9),
    (0x20000, 0x5d6af8dedb81196699c329225ee604),
    (0x40000, 0x2216e584f5fa1ea926041bedfe98),
    (0x80000, 0x48a170391f7dc42444e8fa2),
];

const ODD_TICK_RATIO: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

#[inline]
pub fn q96() -> BigInt { BigInt::one() << 96 }

/// sqrtPriceAtTick(MIN_TICK)
#[inline]
pub fn min_sqrt_ratio() -> BigInt { BigInt::from(4_295_128_739u64) }

/// sqrtPriceAtTick(MAX_TICK)
#[inline]
pub fn max_sqrt_ratio() -> BigInt { BigInt::from_bytes_be(Sign::Plus, &MAX_SQRT_RATIO_BYTES) }

/// Exact TickMath.getSqrtRatioAtTick.
pub fn sqrt_price_at_tick(tick: i32) -> Result<BigInt, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfRange(tick));
    }
    let abs_tick = tick.unsigned_abs();

    // ratio is Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        BigInt::from(ODD_TICK_RATIO)
    } else {
        BigInt::one() << 128
    };

    for (bit, multiplier) in RATIO_MULTIPLIERS {
        if abs_tick & bit != 0 {
            ratio = (ratio * BigInt::from(multiplier)) >> 128;
        }
    }

    if tick > 0 {
        let max = (BigInt::one() << 256) - 1;
        ratio = max / ratio;
    }
    // round-up shift by 32 (Q128.128 -> Q64.96)
    Ok((ratio + 0xffff_ffffu32) >> 32)
}

/// Greatest tick whose sqrt price is <= `sqrt_price_x96` (binary search over the ladder).
pub fn tick_at_sqrt_price(sqrt_price_x96: &BigInt) -> Result<i32, MathError> {
    if *sqrt_price_x96 < min_sqrt_ratio() || *sqrt_price_x96 >= max_sqrt_ratio() {
        return Err(MathError::SqrtPriceOutOfRange);
    }
    let mut lo = MIN_TICK;
    let mut hi = MAX_TICK;
    while lo < hi {
        let mid = lo + ((hi - lo + 1) / 2);
        if sqrt_price_at_tick(mid)? <= *sqrt_price_x96 { lo = mid; } else { hi = mid - 1; }
    }
    Ok(lo)
}

/// Smallest multiple of `tick_spacing` >= MIN_TICK. Truncating division, so the
/// result is rounded toward zero; non-positive spacing falls back to MIN_TICK.
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    if tick_spacing <= 0 {
        return MIN_TICK;
    }
    (MIN_TICK / tick_spacing) * tick_spacing
}

pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    if tick_spacing <= 0 {
        return MAX_TICK;
    }
    (MAX_TICK / tick_spacing) * tick_spacing
}

/// Widest allowed limit for a swap in the given direction.
pub fn swap_price_limit(zero_for_one: bool) -> BigInt {
    if zero_for_one {
        min_sqrt_ratio() + 1
    } else {
        max_sqrt_ratio() - 1
    }
}
