use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - tick {0} out of range")]
    TickOutOfRange(i32),
    #[error("Math error - sqrtPrice out of range")]
    SqrtPriceOutOfRange,
    #[error("Math error - square root of negative numbers is not supported")]
    NegativeSquareRoot,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("Math error - invalid price: {0}")]
    InvalidPrice(String),
    #[error("Math error - price does not fit the decimal range")]
    PriceOutOfRange,
    #[error("Math error - invalid token amount: {0}")]
    InvalidAmount(String),
    #[error("Math error - negative {0} is not supported")]
    NegativeValue(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinerError {
    #[error("Miner error - required bits {required:#x} do not fit a {width}-bit mask")]
    MaskOutOfRange { required: u64, width: u32 },
    #[error("Miner error - mask width {0} exceeds 64 bits")]
    WidthOutOfRange(u32),
    #[error("Miner error - batch size must be positive")]
    EmptyBatch,
    #[error("Miner error - worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    #[error("Deploy error - invalid hex: {0}")]
    InvalidHex(String),
    #[error("Deploy error - invalid address: {0}")]
    InvalidAddress(String),
    #[error("Deploy error - invalid hook flag: {0}")]
    InvalidHookFlag(String),
    #[error("Deploy error - fee {0} does not fit uint24")]
    InvalidFee(u32),
    #[error("Deploy error - tick spacing {0} outside 1..=32767")]
    InvalidTickSpacing(i32),
    #[error("Deploy error - pool needs two distinct currencies, got {0:?} twice")]
    IdenticalCurrencies(ethers::types::Address),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Miner(#[from] MinerError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}
