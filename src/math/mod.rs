pub mod liquidity;
pub mod sqrt_price;
pub mod tick_math;
pub mod units;
