use std::time::Duration;

use chrono::{DateTime, Utc};
use ethers::types::{Address, H256};
use serde::Serialize;

use crate::chain::hook_flags::HookPermissions;
use crate::chain::pool_key::PoolKey;
use crate::engine::miner::{MinerParams, MiningOutcome};
use crate::math::liquidity::MintPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningStatus {
    Found,
    NotFound,
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct MiningReport {
    pub status: MiningStatus,
    pub deployer: Address,
    pub init_code_hash: H256,
    pub required_flags: String,
    pub permissions: HookPermissions,
    pub salt: Option<H256>,
    pub hook_address: Option<Address>,
    pub nonce: Option<String>,
    pub attempts: u64,
    /// Where a follow-up search should start when nothing was found.
    pub next_nonce: Option<String>,
    pub parallel: bool,
    pub elapsed_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: String,
    pub amount0_max: String,
    pub amount1_max: String,
}

#[derive(Debug, Serialize)]
pub struct PoolInitReport {
    pub pool_key: PoolKey,
    pub pool_id: H256,
    pub sqrt_price_x96: String,
    pub tick: i32,
    pub price: String,
    pub position: Option<PositionReport>,
}

#[derive(Debug, Serialize)]
pub struct DeploymentReport {
    pub timestamp_utc: DateTime<Utc>,
    pub mining: MiningReport,
    pub pool: Option<PoolInitReport>,
}

impl MiningReport {
    pub fn new(params: &MinerParams, outcome: &MiningOutcome, parallel: bool, elapsed: Duration) -> Self {
        let required = params.mask.required_bits();
        let (status, next_nonce) = match outcome {
            MiningOutcome::Found(_) => (MiningStatus::Found, None),
            MiningOutcome::NotFound { next_nonce, .. } => (MiningStatus::NotFound, Some(next_nonce.to_string())),
            MiningOutcome::Cancelled { next_nonce, .. } => (MiningStatus::Cancelled, Some(next_nonce.to_string())),
        };
        let found = outcome.found();

        Self {
            status,
            deployer: params.deployer,
            init_code_hash: params.init_code_hash,
            required_flags: format!("{:#06x}", required),
            permissions: HookPermissions::from_mask(required),
            salt: found.map(|m| m.salt),
            hook_address: found.map(|m| m.address),
            nonce: found.map(|m| m.nonce.to_string()),
            attempts: outcome.attempts(),
            next_nonce,
            parallel,
            elapsed_ms: elapsed.as_millis(),
        }
    }
}

impl From<&MintPlan> for PositionReport {
    fn from(plan: &MintPlan) -> Self {
        Self {
            tick_lower: plan.tick_lower,
            tick_upper: plan.tick_upper,
            liquidity: plan.liquidity.to_string(),
            amount0_max: plan.amount0_max.to_string(),
            amount1_max: plan.amount1_max.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::miner::MinedSalt;
    use ethers::types::U256;

    fn params() -> MinerParams {
        MinerParams::new(Address::from_low_u64_be(7), H256::repeat_byte(0x11))
    }

    #[test]
    fn found_report_serialises_addresses_as_hex() {
        let mined = MinedSalt {
            salt: H256::from_low_u64_be(42),
            address: Address::from_low_u64_be(0x00c0),
            nonce: U256::from(42),
            attempts: 41,
        };
        let report = MiningReport::new(&params(), &MiningOutcome::Found(mined), false, Duration::from_millis(12));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "found");
        assert_eq!(json["required_flags"], "0x00c0");
        assert_eq!(json["nonce"], "42");
        assert_eq!(json["attempts"], 41);
        assert_eq!(json["hook_address"], "0x00000000000000000000000000000000000000c0");
        assert_eq!(json["permissions"]["before_swap"], true);
        assert!(json["next_nonce"].is_null());
    }

    #[test]
    fn not_found_report_carries_resume_point() {
        let outcome = MiningOutcome::NotFound { attempts: 200_000, next_nonce: U256::from(200_001) };
        let report = MiningReport::new(&params(), &outcome, true, Duration::ZERO);
        assert_eq!(report.status, MiningStatus::NotFound);
        assert_eq!(report.next_nonce.as_deref(), Some("200001"));
        assert!(report.salt.is_none() && report.hook_address.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "not_found");
    }
}
