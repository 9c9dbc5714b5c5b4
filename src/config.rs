use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub hook_deployer: String,
    pub hook_init_code_hash: Option<String>,
    pub hook_bytecode: Option<String>,
    pub hook_constructor_args: Vec<String>,
    pub hook_required_flags: String,

    // Miner
    pub miner_start_nonce: u64,
    pub miner_max_attempts: u64,
    pub miner_batch_size: u64,
    pub miner_parallel: bool,

    pub pool: Option<PoolConfig>,
}

/// Pool settings. Decimals, price and amounts refer to the sorted pair
/// (currency0 is the numerically smaller address).
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub token_a: String,
    pub token_b: String,
    pub fee: u32,
    pub tick_spacing: i32,
    pub initial_price: String,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    pub amount0: String,
    pub amount1: String,
    pub slippage_bps: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load configuration files (secrets first, then public config)
        dotenv::from_filename("secrets.env").ok();
        dotenv::from_filename("deploy.env").ok();
        dotenv::from_filename("config/deploy.env").ok();
        dotenv::dotenv().ok();

        let hook_init_code_hash = env::var("HOOK_INIT_CODE_HASH").ok();
        let hook_bytecode = env::var("HOOK_BYTECODE").ok();
        if hook_init_code_hash.is_none() && hook_bytecode.is_none() {
            return Err("HOOK_INIT_CODE_HASH or HOOK_BYTECODE must be set".into());
        }

        Ok(Config {
            hook_deployer: env::var("HOOK_DEPLOYER")
                .map_err(|_| "HOOK_DEPLOYER must be set")?,
            hook_init_code_hash,
            hook_bytecode,
            hook_constructor_args: env::var("HOOK_CONSTRUCTOR_ARGS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            hook_required_flags: env::var("HOOK_REQUIRED_FLAGS")
                .unwrap_or_else(|_| "before_swap,after_swap".to_string()),

            miner_start_nonce: env::var("MINER_START_NONCE")
                .unwrap_or_else(|_| "1".to_string()).parse()?,
            miner_max_attempts: env::var("MINER_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "200000".to_string()).parse()?,
            miner_batch_size: env::var("MINER_BATCH_SIZE")
                .unwrap_or_else(|_| "5000".to_string()).parse()?,
            miner_parallel: env::var("MINER_PARALLEL")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),

            pool: PoolConfig::from_env()?,
        })
    }
}

impl PoolConfig {
    /// `None` unless both pool tokens are configured.
    fn from_env() -> Result<Option<Self>, Box<dyn std::error::Error>> {
        let (token_a, token_b) = match (env::var("POOL_TOKEN_A"), env::var("POOL_TOKEN_B")) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(_), Err(_)) => return Ok(None),
            _ => return Err("POOL_TOKEN_A and POOL_TOKEN_B must be set together".into()),
        };

        Ok(Some(PoolConfig {
            token_a,
            token_b,
            fee: env::var("POOL_FEE")
                .unwrap_or_else(|_| "3000".to_string()).parse()?,
            tick_spacing: env::var("POOL_TICK_SPACING")
                .unwrap_or_else(|_| "60".to_string()).parse()?,
            initial_price: env::var("POOL_INITIAL_PRICE")
                .unwrap_or_else(|_| "1".to_string()),
            token0_decimals: env::var("POOL_TOKEN0_DECIMALS")
                .unwrap_or_else(|_| "18".to_string()).parse()?,
            token1_decimals: env::var("POOL_TOKEN1_DECIMALS")
                .unwrap_or_else(|_| "18".to_string()).parse()?,
            amount0: env::var("POOL_AMOUNT0").unwrap_or_default(),
            amount1: env::var("POOL_AMOUNT1").unwrap_or_default(),
            slippage_bps: env::var("POOL_SLIPPAGE_BPS")
                .unwrap_or_else(|_| "50".to_string()).parse()?,
        }))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_values_are_trimmed() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
