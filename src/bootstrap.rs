use ethers::types::{Address, U256};
use num_bigint::BigInt;

use crate::chain::create2::init_code_hash;
use crate::chain::hook_flags::{AddressMask, HookFlag, ALL_HOOK_MASK};
use crate::chain::keccak::{parse_address, parse_hash, parse_hex_bytes};
use crate::config::{Config, PoolConfig};
use crate::engine::miner::MinerParams;
use crate::error::DeployError;
use crate::math::units::parse_units;

/// Typed view of [`Config`]: everything needed to mine the hook salt and
/// describe the pool it will serve.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    pub miner: MinerParams,
    pub batch_size: u64,
    pub parallel: bool,
    pub pool: Option<PoolPlan>,
}

#[derive(Debug, Clone)]
pub struct PoolPlan {
    pub token_a: Address,
    pub token_b: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub initial_price: String,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    pub amount0: BigInt,
    pub amount1: BigInt,
    pub slippage_bps: u32,
}

impl DeploymentPlan {
    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let deployer = parse_address(&config.hook_deployer)?;

        let code_hash = match (&config.hook_init_code_hash, &config.hook_bytecode) {
            (Some(hash), _) => parse_hash(hash)?,
            (None, Some(bytecode)) => {
                let args = config
                    .hook_constructor_args
                    .iter()
                    .map(|arg| parse_address(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                init_code_hash(&parse_hex_bytes(bytecode)?, &args)
            }
            (None, None) => return Err("HOOK_INIT_CODE_HASH or HOOK_BYTECODE must be set".into()),
        };

        let required = parse_required_flags(&config.hook_required_flags)?;
        let miner = MinerParams::new(deployer, code_hash)
            .with_mask(AddressMask::hook_flags(required)?)
            .with_start_nonce(U256::from(config.miner_start_nonce))
            .with_max_attempts(config.miner_max_attempts);

        log::debug!(
            "deployment plan: deployer {:?}, init code hash {:?}, flags {:#06x}",
            deployer, code_hash, required
        );

        Ok(DeploymentPlan {
            miner,
            batch_size: config.miner_batch_size,
            parallel: config.miner_parallel,
            pool: config.pool.as_ref().map(PoolPlan::new).transpose()?,
        })
    }
}

impl PoolPlan {
    pub fn new(pool: &PoolConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(PoolPlan {
            token_a: parse_address(&pool.token_a)?,
            token_b: parse_address(&pool.token_b)?,
            fee: pool.fee,
            tick_spacing: pool.tick_spacing,
            initial_price: pool.initial_price.clone(),
            token0_decimals: pool.token0_decimals,
            token1_decimals: pool.token1_decimals,
            amount0: parse_units(&pool.amount0, pool.token0_decimals)?,
            amount1: parse_units(&pool.amount1, pool.token1_decimals)?,
            slippage_bps: pool.slippage_bps,
        })
    }
}

/// Accepts a number (`0xC0`, `192`) or a comma list of callback names
/// (`before_swap,after_swap`).
pub fn parse_required_flags(value: &str) -> Result<u64, DeployError> {
    let value = value.trim();
    let numeric = if let Some(hex_digits) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(u64::from_str_radix(hex_digits, 16))
    } else if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Some(value.parse::<u64>())
    } else {
        None
    };

    let mask = match numeric {
        Some(parsed) => parsed.map_err(|_| DeployError::InvalidHookFlag(value.to_string()))?,
        None => value
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| name.parse::<HookFlag>().map(HookFlag::bit))
            .try_fold(0u64, |acc, bit| bit.map(|b| acc | b))?,
    };

    if mask & !ALL_HOOK_MASK != 0 {
        return Err(DeployError::InvalidHookFlag(value.to_string()));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::hook_flags::{BEFORE_INITIALIZE_FLAG, REQUIRED_HOOK_FLAGS};

    fn config() -> Config {
        Config {
            hook_deployer: "0x4e59b44847b379578588920cA78FbF26c0B4956C".to_string(),
            hook_init_code_hash: None,
            hook_bytecode: Some("0x6080604052".to_string()),
            hook_constructor_args: vec!["0x000000000004444c5dc75cB358380D2e3dE08A90".to_string()],
            hook_required_flags: "before_swap, after_swap".to_string(),
            miner_start_nonce: 1,
            miner_max_attempts: 200_000,
            miner_batch_size: 5_000,
            miner_parallel: false,
            pool: Some(PoolConfig {
                token_a: "0x2222222222222222222222222222222222222222".to_string(),
                token_b: "0x1111111111111111111111111111111111111111".to_string(),
                fee: 3000,
                tick_spacing: 60,
                initial_price: "1".to_string(),
                token0_decimals: 18,
                token1_decimals: 6,
                amount0: "1.5".to_string(),
                amount1: "3000".to_string(),
                slippage_bps: 50,
            }),
        }
    }

    #[test]
    fn flags_accept_numbers_and_names() {
        assert_eq!(parse_required_flags("0x00C0").unwrap(), REQUIRED_HOOK_FLAGS);
        assert_eq!(parse_required_flags("192").unwrap(), REQUIRED_HOOK_FLAGS);
        assert_eq!(parse_required_flags("after-swap,before_swap").unwrap(), REQUIRED_HOOK_FLAGS);
        assert_eq!(parse_required_flags("before_initialize").unwrap(), BEFORE_INITIALIZE_FLAG);
        assert_eq!(parse_required_flags("").unwrap(), 0);
    }

    #[test]
    fn flags_reject_unknown_names_and_wide_masks() {
        assert!(parse_required_flags("before_lunch").is_err());
        assert!(parse_required_flags("0x4000").is_err());
        assert!(parse_required_flags("0xZZ").is_err());
    }

    #[test]
    fn plan_hashes_bytecode_with_constructor_args() {
        let cfg = config();
        let plan = DeploymentPlan::new(&cfg).unwrap();
        let manager = parse_address(&cfg.hook_constructor_args[0]).unwrap();
        let expected = init_code_hash(&[0x60, 0x80, 0x60, 0x40, 0x52], &[manager]);
        assert_eq!(plan.miner.init_code_hash, expected);
        assert_eq!(plan.miner.mask.required_bits(), REQUIRED_HOOK_FLAGS);
        assert_eq!(plan.miner.start_nonce, U256::one());
    }

    #[test]
    fn explicit_hash_wins_over_bytecode() {
        let mut cfg = config();
        let hash = format!("0x{}", "ab".repeat(32));
        cfg.hook_init_code_hash = Some(hash.clone());
        let plan = DeploymentPlan::new(&cfg).unwrap();
        assert_eq!(plan.miner.init_code_hash, parse_hash(&hash).unwrap());
    }

    #[test]
    fn pool_amounts_use_token_decimals() {
        let plan = DeploymentPlan::new(&config()).unwrap();
        let pool = plan.pool.unwrap();
        assert_eq!(pool.amount0, BigInt::from(1_500_000_000_000_000_000u64));
        assert_eq!(pool.amount1, BigInt::from(3_000_000_000u64));
    }

    #[test]
    fn bad_deployer_is_rejected() {
        let mut cfg = config();
        cfg.hook_deployer = "0x1234".to_string();
        assert!(DeploymentPlan::new(&cfg).is_err());
    }
}
