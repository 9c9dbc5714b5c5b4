use std::time::Instant;

use chrono::Utc;
use ethers::types::Address;
use num_traits::Zero;

use crate::bootstrap::{DeploymentPlan, PoolPlan};
use crate::chain::pool_key::build_pool_key;
use crate::engine::{
    miner::MiningOutcome,
    parallel::mine_parallel,
    task::spawn_mining,
};
use crate::error::{Error, MinerError};
use crate::math::{
    liquidity::full_range_position,
    sqrt_price::{price_at_sqrt_price, price_to_sqrt_price_x96_with_decimals},
    tick_math::tick_at_sqrt_price,
};
use crate::models::{DeploymentReport, MiningReport, PoolInitReport, PositionReport};

/// Mines the hook salt and, when a pool is configured and a hook address was
/// found, prepares the pool initialisation and first full-range position.
pub async fn run_deployment(plan: &DeploymentPlan) -> Result<DeploymentReport, Error> {
    let started = Instant::now();
    let outcome = mine_hook_salt(plan).await?;
    let mining = MiningReport::new(&plan.miner, &outcome, plan.parallel, started.elapsed());

    let pool = match (outcome.found(), &plan.pool) {
        (Some(mined), Some(pool)) => Some(prepare_pool(pool, mined.address)?),
        (None, Some(_)) => {
            log::warn!("no hook address mined; skipping pool preparation");
            None
        }
        _ => None,
    };

    Ok(DeploymentReport { timestamp_utc: Utc::now(), mining, pool })
}

async fn mine_hook_salt(plan: &DeploymentPlan) -> Result<MiningOutcome, MinerError> {
    if plan.parallel {
        let params = plan.miner.clone();
        return tokio::task::spawn_blocking(move || mine_parallel(&params))
            .await
            .map_err(|e| MinerError::Worker(e.to_string()))?;
    }

    let mut task = spawn_mining(plan.miner.clone(), plan.batch_size);
    while let Some(progress) = task.next_progress().await {
        log::info!("mining: {}/{} attempts", progress.attempts, progress.max_attempts);
    }
    task.finish().await
}

pub fn prepare_pool(pool: &PoolPlan, hooks: Address) -> Result<PoolInitReport, Error> {
    let key = build_pool_key(pool.token_a, pool.token_b, pool.fee, pool.tick_spacing, hooks)?;
    let pool_id = key.pool_id();

    let sqrt_price_x96 =
        price_to_sqrt_price_x96_with_decimals(&pool.initial_price, pool.token0_decimals, pool.token1_decimals)?;
    let tick = tick_at_sqrt_price(&sqrt_price_x96)?;
    let price = price_at_sqrt_price(&sqrt_price_x96, pool.token0_decimals, pool.token1_decimals)?;

    let position = if pool.amount0.is_zero() && pool.amount1.is_zero() {
        None
    } else {
        let plan = full_range_position(
            &sqrt_price_x96,
            key.tick_spacing,
            &pool.amount0,
            &pool.amount1,
            pool.slippage_bps,
        )?;
        Some(PositionReport::from(&plan))
    };

    log::info!("pool {:?} initialises at tick {} (price {})", pool_id, tick, price);

    Ok(PoolInitReport {
        pool_key: key,
        pool_id,
        sqrt_price_x96: sqrt_price_x96.to_string(),
        tick,
        price: price.to_string(),
        position,
    })
}
