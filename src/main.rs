use anyhow::{anyhow, Context};

use uniswap_v4_deploy::{bootstrap, config, engine::service, models::MiningStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Load configuration
    let config = config::Config::from_env()
        .map_err(|e| anyhow!("failed to load configuration: {}", e))?;

    // Build deployment plan
    let plan = bootstrap::DeploymentPlan::new(&config)
        .map_err(|e| anyhow!("invalid deployment settings: {}", e))?;

    let report = service::run_deployment(&plan).await?;
    if report.mining.status != MiningStatus::Found {
        log::warn!(
            "no hook salt found in {} attempts; raise MINER_MAX_ATTEMPTS or set MINER_START_NONCE={}",
            report.mining.attempts,
            report.mining.next_nonce.as_deref().unwrap_or("?")
        );
    }

    let json = serde_json::to_string_pretty(&report).context("failed to serialise report")?;
    println!("{}", json);
    Ok(())
}
