// Uniswap v4 decides which hook callbacks to invoke by inspecting the least
// significant bits of the hook contract's own address. An address ending in
// ...2400 has bits 13 and 10 set: before-initialize and after-add-liquidity.

use std::fmt;
use std::str::FromStr;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::error::{DeployError, MinerError};

pub const HOOK_MASK_WIDTH: u32 = 14;
pub const ALL_HOOK_MASK: u64 = (1 << HOOK_MASK_WIDTH) - 1;

pub const BEFORE_INITIALIZE_FLAG: u64 = 1 << 13;
pub const AFTER_INITIALIZE_FLAG: u64 = 1 << 12;
pub const BEFORE_ADD_LIQUIDITY_FLAG: u64 = 1 << 11;
pub const AFTER_ADD_LIQUIDITY_FLAG: u64 = 1 << 10;
pub const BEFORE_REMOVE_LIQUIDITY_FLAG: u64 = 1 << 9;
pub const AFTER_REMOVE_LIQUIDITY_FLAG: u64 = 1 << 8;
pub const BEFORE_SWAP_FLAG: u64 = 1 << 7;
pub const AFTER_SWAP_FLAG: u64 = 1 << 6;
pub const BEFORE_DONATE_FLAG: u64 = 1 << 5;
pub const AFTER_DONATE_FLAG: u64 = 1 << 4;
pub const BEFORE_SWAP_RETURNS_DELTA_FLAG: u64 = 1 << 3;
pub const AFTER_SWAP_RETURNS_DELTA_FLAG: u64 = 1 << 2;
pub const AFTER_ADD_LIQUIDITY_RETURNS_DELTA_FLAG: u64 = 1 << 1;
pub const AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA_FLAG: u64 = 1;

/// Capability set the wizard's hooks ship with: before + after swap.
pub const REQUIRED_HOOK_FLAGS: u64 = BEFORE_SWAP_FLAG | AFTER_SWAP_FLAG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookFlag {
    BeforeInitialize,
    AfterInitialize,
    BeforeAddLiquidity,
    AfterAddLiquidity,
    BeforeRemoveLiquidity,
    AfterRemoveLiquidity,
    BeforeSwap,
    AfterSwap,
    BeforeDonate,
    AfterDonate,
    BeforeSwapReturnsDelta,
    AfterSwapReturnsDelta,
    AfterAddLiquidityReturnsDelta,
    AfterRemoveLiquidityReturnsDelta,
}

impl HookFlag {
    pub const ALL: [HookFlag; 14] = [
        HookFlag::BeforeInitialize,
        HookFlag::AfterInitialize,
        HookFlag::BeforeAddLiquidity,
        HookFlag::AfterAddLiquidity,
        HookFlag::BeforeRemoveLiquidity,
        HookFlag::AfterRemoveLiquidity,
        HookFlag::BeforeSwap,
        HookFlag::AfterSwap,
        HookFlag::BeforeDonate,
        HookFlag::AfterDonate,
        HookFlag::BeforeSwapReturnsDelta,
        HookFlag::AfterSwapReturnsDelta,
        HookFlag::AfterAddLiquidityReturnsDelta,
        HookFlag::AfterRemoveLiquidityReturnsDelta,
    ];

    pub fn bit(self) -> u64 {
        match self {
            HookFlag::BeforeInitialize => BEFORE_INITIALIZE_FLAG,
            HookFlag::AfterInitialize => AFTER_INITIALIZE_FLAG,
            HookFlag::BeforeAddLiquidity => BEFORE_ADD_LIQUIDITY_FLAG,
            HookFlag::AfterAddLiquidity => AFTER_ADD_LIQUIDITY_FLAG,
            HookFlag::BeforeRemoveLiquidity => BEFORE_REMOVE_LIQUIDITY_FLAG,
            HookFlag::AfterRemoveLiquidity => AFTER_REMOVE_LIQUIDITY_FLAG,
            HookFlag::BeforeSwap => BEFORE_SWAP_FLAG,
            HookFlag::AfterSwap => AFTER_SWAP_FLAG,
            HookFlag::BeforeDonate => BEFORE_DONATE_FLAG,
            HookFlag::AfterDonate => AFTER_DONATE_FLAG,
            HookFlag::BeforeSwapReturnsDelta => BEFORE_SWAP_RETURNS_DELTA_FLAG,
            HookFlag::AfterSwapReturnsDelta => AFTER_SWAP_RETURNS_DELTA_FLAG,
            HookFlag::AfterAddLiquidityReturnsDelta => AFTER_ADD_LIQUIDITY_RETURNS_DELTA_FLAG,
            HookFlag::AfterRemoveLiquidityReturnsDelta => AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA_FLAG,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HookFlag::BeforeInitialize => "before_initialize",
            HookFlag::AfterInitialize => "after_initialize",
            HookFlag::BeforeAddLiquidity => "before_add_liquidity",
            HookFlag::AfterAddLiquidity => "after_add_liquidity",
            HookFlag::BeforeRemoveLiquidity => "before_remove_liquidity",
            HookFlag::AfterRemoveLiquidity => "after_remove_liquidity",
            HookFlag::BeforeSwap => "before_swap",
            HookFlag::AfterSwap => "after_swap",
            HookFlag::BeforeDonate => "before_donate",
            HookFlag::AfterDonate => "after_donate",
            HookFlag::BeforeSwapReturnsDelta => "before_swap_returns_delta",
            HookFlag::AfterSwapReturnsDelta => "after_swap_returns_delta",
            HookFlag::AfterAddLiquidityReturnsDelta => "after_add_liquidity_returns_delta",
            HookFlag::AfterRemoveLiquidityReturnsDelta => "after_remove_liquidity_returns_delta",
        }
    }
}

impl fmt::Display for HookFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HookFlag {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        HookFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == wanted)
            .ok_or_else(|| DeployError::InvalidHookFlag(s.trim().to_string()))
    }
}

/// One boolean per callback, mirroring `Hooks.Permissions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookPermissions {
    pub before_initialize: bool,
    pub after_initialize: bool,
    pub before_add_liquidity: bool,
    pub after_add_liquidity: bool,
    pub before_remove_liquidity: bool,
    pub after_remove_liquidity: bool,
    pub before_swap: bool,
    pub after_swap: bool,
    pub before_donate: bool,
    pub after_donate: bool,
    pub before_swap_returns_delta: bool,
    pub after_swap_returns_delta: bool,
    pub after_add_liquidity_returns_delta: bool,
    pub after_remove_liquidity_returns_delta: bool,
}

impl HookPermissions {
    pub fn from_flags(flags: &[HookFlag]) -> Self {
        Self::from_mask(flags.iter().fold(0, |mask, flag| mask | flag.bit()))
    }

    pub fn from_mask(mask: u64) -> Self {
        let on = |flag: HookFlag| mask & flag.bit() != 0;
        Self {
            before_initialize: on(HookFlag::BeforeInitialize),
            after_initialize: on(HookFlag::AfterInitialize),
            before_add_liquidity: on(HookFlag::BeforeAddLiquidity),
            after_add_liquidity: on(HookFlag::AfterAddLiquidity),
            before_remove_liquidity: on(HookFlag::BeforeRemoveLiquidity),
            after_remove_liquidity: on(HookFlag::AfterRemoveLiquidity),
            before_swap: on(HookFlag::BeforeSwap),
            after_swap: on(HookFlag::AfterSwap),
            before_donate: on(HookFlag::BeforeDonate),
            after_donate: on(HookFlag::AfterDonate),
            before_swap_returns_delta: on(HookFlag::BeforeSwapReturnsDelta),
            after_swap_returns_delta: on(HookFlag::AfterSwapReturnsDelta),
            after_add_liquidity_returns_delta: on(HookFlag::AfterAddLiquidityReturnsDelta),
            after_remove_liquidity_returns_delta: on(HookFlag::AfterRemoveLiquidityReturnsDelta),
        }
    }

    /// Permissions a deployed hook advertises through its address.
    pub fn from_address(address: Address) -> Self {
        Self::from_mask(address_low_bits(address, HOOK_MASK_WIDTH))
    }

    pub fn enabled(&self) -> Vec<HookFlag> {
        let mask = self.to_mask();
        HookFlag::ALL.into_iter().filter(|flag| mask & flag.bit() != 0).collect()
    }

    pub fn to_mask(&self) -> u64 {
        [
            (self.before_initialize, BEFORE_INITIALIZE_FLAG),
            (self.after_initialize, AFTER_INITIALIZE_FLAG),
            (self.before_add_liquidity, BEFORE_ADD_LIQUIDITY_FLAG),
            (self.after_add_liquidity, AFTER_ADD_LIQUIDITY_FLAG),
            (self.before_remove_liquidity, BEFORE_REMOVE_LIQUIDITY_FLAG),
            (self.after_remove_liquidity, AFTER_REMOVE_LIQUIDITY_FLAG),
            (self.before_swap, BEFORE_SWAP_FLAG),
            (self.after_swap, AFTER_SWAP_FLAG),
            (self.before_donate, BEFORE_DONATE_FLAG),
            (self.after_donate, AFTER_DONATE_FLAG),
            (self.before_swap_returns_delta, BEFORE_SWAP_RETURNS_DELTA_FLAG),
            (self.after_swap_returns_delta, AFTER_SWAP_RETURNS_DELTA_FLAG),
            (self.after_add_liquidity_returns_delta, AFTER_ADD_LIQUIDITY_RETURNS_DELTA_FLAG),
            (self.after_remove_liquidity_returns_delta, AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA_FLAG),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .fold(0, |mask, (_, bit)| mask | bit)
    }
}

/// Acceptance predicate of the salt miner: `(address & mask) == required_bits`,
/// with `mask` covering the lowest `width` bits of the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressMask {
    required_bits: u64,
    width: u32,
}

impl AddressMask {
    pub fn new(required_bits: u64, width: u32) -> Result<Self, MinerError> {
        if width > 64 {
            return Err(MinerError::WidthOutOfRange(width));
        }
        let mask = Self { required_bits, width };
        if required_bits & !mask.all_bits() != 0 {
            return Err(MinerError::MaskOutOfRange { required: required_bits, width });
        }
        Ok(mask)
    }

    pub fn hook_flags(required_bits: u64) -> Result<Self, MinerError> {
        Self::new(required_bits, HOOK_MASK_WIDTH)
    }

    pub fn required_bits(&self) -> u64 {
        self.required_bits
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn all_bits(&self) -> u64 {
        low_mask(self.width)
    }

    #[inline]
    pub fn matches(&self, address: Address) -> bool {
        address_low_bits(address, self.width) == self.required_bits
    }
}

impl Default for AddressMask {
    fn default() -> Self {
        Self { required_bits: REQUIRED_HOOK_FLAGS, width: HOOK_MASK_WIDTH }
    }
}

#[inline]
fn low_mask(width: u32) -> u64 {
    if width >= 64 { u64::MAX } else { (1u64 << width) - 1 }
}

/// Lowest `width` bits (at most 64) of the address read as a big-endian integer.
#[inline]
pub fn address_low_bits(address: Address, width: u32) -> u64 {
    let bytes = address.as_bytes();
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&bytes[12..20]);
    u64::from_be_bytes(tail) & low_mask(width)
}

pub fn is_valid_hook_address(address: Address, required_mask: u64) -> bool {
    address_low_bits(address, HOOK_MASK_WIDTH) == required_mask
}
