use ethers::abi::{self, Token};
use ethers::types::{Address, H256, I256, U256};
use serde::{Deserialize, Serialize};

use crate::chain::keccak::keccak256;
use crate::error::DeployError;

pub const ZERO_ADDRESS: Address = Address::zero();

const MAX_FEE: u32 = (1 << 24) - 1;
/// Spacing bounds enforced by the pool manager at initialisation.
pub const MIN_TICK_SPACING: i32 = 1;
pub const MAX_TICK_SPACING: i32 = i16::MAX as i32;

/// A v4 pool identity. `currency0 < currency1` holds for every key built through
/// [`build_pool_key`]; the native currency is the zero address and always sorts first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

impl PoolKey {
    /// keccak256(abi.encode(currency0, currency1, uint24 fee, int24 tickSpacing, hooks))
    pub fn pool_id(&self) -> H256 {
        keccak256(abi::encode(&self.abi_tokens()))
    }

    fn abi_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.currency0),
            Token::Address(self.currency1),
            Token::Uint(U256::from(self.fee)),
            Token::Int(I256::from(self.tick_spacing).into_raw()),
            Token::Address(self.hooks),
        ]
    }
}

/// Numeric address order; identical to comparing lowercase hex strings of equal length.
pub fn sort_currencies(a: Address, b: Address) -> (Address, Address) {
    if a < b { (a, b) } else { (b, a) }
}

pub fn build_pool_key(
    token_a: Address,
    token_b: Address,
    fee: u32,
    tick_spacing: i32,
    hooks: Address,
) -> Result<PoolKey, DeployError> {
    if fee > MAX_FEE {
        return Err(DeployError::InvalidFee(fee));
    }
    if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing) {
        return Err(DeployError::InvalidTickSpacing(tick_spacing));
    }
    if token_a == token_b {
        return Err(DeployError::IdenticalCurrencies(token_a));
    }
    let (currency0, currency1) = sort_currencies(token_a, token_b);
    Ok(PoolKey { currency0, currency1, fee, tick_spacing, hooks })
}

pub fn compute_pool_id(key: &PoolKey) -> H256 {
    key.pool_id()
}

pub fn is_zero_address(address: Option<&Address>) -> bool {
    address.map_or(true, |a| *a == ZERO_ADDRESS)
}
