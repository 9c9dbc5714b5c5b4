// Sequential hook-salt search. Salts are the big-endian encodings of consecutive
// nonces starting at `start_nonce`; the first derived address whose low bits
// match the mask wins. The cursor is plain data, so a search can be paused after
// any batch and resumed (or abandoned) by whoever owns it.

use std::sync::atomic::{AtomicBool, Ordering};

use ethers::types::{Address, H256, U256};

use crate::chain::create2::{derive_address, format_salt};
use crate::chain::hook_flags::AddressMask;
use crate::error::MinerError;

pub const DEFAULT_START_NONCE: u64 = 1;
pub const DEFAULT_MAX_ATTEMPTS: u64 = 200_000;
pub const DEFAULT_BATCH_SIZE: u64 = 5_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinerParams {
    pub deployer: Address,
    pub init_code_hash: H256,
    pub mask: AddressMask,
    pub start_nonce: U256,
    pub max_attempts: u64,
}

impl MinerParams {
    /// Defaults: before/after-swap flags over 14 bits, nonce 1, 200k attempts.
    pub fn new(deployer: Address, init_code_hash: H256) -> Self {
        Self {
            deployer,
            init_code_hash,
            mask: AddressMask::default(),
            start_nonce: U256::from(DEFAULT_START_NONCE),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Replaces the required bits, keeping the current mask width.
    pub fn with_required_mask(mut self, required_bits: u64) -> Result<Self, MinerError> {
        self.mask = AddressMask::new(required_bits, self.mask.width())?;
        Ok(self)
    }

    pub fn with_mask(mut self, mask: AddressMask) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_start_nonce(mut self, start_nonce: U256) -> Self {
        self.start_nonce = start_nonce;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Attempts actually available: `max_attempts`, cut short if the nonce would
    /// run past U256::MAX.
    pub fn searchable_attempts(&self) -> u64 {
        let headroom = U256::MAX - self.start_nonce;
        if headroom >= U256::from(self.max_attempts) {
            self.max_attempts
        } else {
            headroom.as_u64() + 1
        }
    }

    /// Nonce, salt and address for the candidate `offset` places after the start.
    /// Callers keep `offset < searchable_attempts()`.
    #[inline]
    pub fn candidate(&self, offset: u64) -> (U256, H256, Address) {
        let nonce = self.start_nonce + U256::from(offset);
        let salt = format_salt(nonce);
        (nonce, salt, derive_address(self.deployer, salt, self.init_code_hash))
    }

    fn next_nonce_after(&self, attempts: u64) -> U256 {
        self.start_nonce.saturating_add(U256::from(attempts))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinedSalt {
    pub salt: H256,
    pub address: Address,
    pub nonce: U256,
    /// Candidates rejected before this one; 0 when the start nonce matched.
    pub attempts: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MiningOutcome {
    Found(MinedSalt),
    /// The bounded search ran out; widen `max_attempts` or resume from `next_nonce`.
    NotFound { attempts: u64, next_nonce: U256 },
    Cancelled { attempts: u64, next_nonce: U256 },
}

impl MiningOutcome {
    pub fn found(&self) -> Option<&MinedSalt> {
        match self {
            MiningOutcome::Found(mined) => Some(mined),
            _ => None,
        }
    }

    pub fn attempts(&self) -> u64 {
        match self {
            MiningOutcome::Found(mined) => mined.attempts,
            MiningOutcome::NotFound { attempts, .. } | MiningOutcome::Cancelled { attempts, .. } => *attempts,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchStep {
    Found(MinedSalt),
    Continue { attempts: u64 },
    Exhausted { attempts: u64, next_nonce: U256 },
}

/// Resumable search cursor.
#[derive(Clone, Debug)]
pub struct SaltSearch {
    params: MinerParams,
    limit: u64,
    attempts: u64,
}

impl SaltSearch {
    pub fn new(params: MinerParams) -> Self {
        Self::resume(params, 0)
    }

    /// Continue a search that already rejected `attempts` candidates.
    pub fn resume(params: MinerParams, attempts: u64) -> Self {
        let limit = params.searchable_attempts();
        Self { params, limit, attempts }
    }

    pub fn params(&self) -> &MinerParams {
        &self.params
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn next_nonce(&self) -> U256 {
        self.params.next_nonce_after(self.attempts)
    }

    /// Tests at most `batch_size` candidates. A found salt is returned again on
    /// every later call; the cursor does not move past it.
    pub fn next_batch(&mut self, batch_size: u64) -> BatchStep {
        let end = self.attempts.saturating_add(batch_size).min(self.limit);

        while self.attempts < end {
            let (nonce, salt, address) = self.params.candidate(self.attempts);
            if self.params.mask.matches(address) {
                return BatchStep::Found(MinedSalt { salt, address, nonce, attempts: self.attempts });
            }
            self.attempts += 1;
        }

        if self.attempts >= self.limit {
            BatchStep::Exhausted { attempts: self.attempts, next_nonce: self.next_nonce() }
        } else {
            BatchStep::Continue { attempts: self.attempts }
        }
    }
}

/// Runs the search in `batch_size` steps, reporting the attempt count after each
/// unsuccessful batch and checking `cancel` before starting the next one.
pub fn mine_with_progress(
    params: &MinerParams,
    batch_size: u64,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(u64),
) -> Result<MiningOutcome, MinerError> {
    if batch_size == 0 {
        return Err(MinerError::EmptyBatch);
    }
    log::debug!(
        "mining salt for deployer {:?}, mask {:#06x}/{} bits, start nonce {}, max attempts {}",
        params.deployer,
        params.mask.required_bits(),
        params.mask.width(),
        params.start_nonce,
        params.max_attempts
    );

    let mut search = SaltSearch::new(params.clone());
    loop {
        if cancel.load(Ordering::Relaxed) {
            log::info!("salt search cancelled after {} attempts", search.attempts());
            return Ok(MiningOutcome::Cancelled {
                attempts: search.attempts(),
                next_nonce: search.next_nonce(),
            });
        }

        match search.next_batch(batch_size) {
            BatchStep::Found(mined) => {
                log::info!(
                    "found hook address {:?} with salt nonce {} after {} attempts",
                    mined.address, mined.nonce, mined.attempts
                );
                return Ok(MiningOutcome::Found(mined));
            }
            BatchStep::Continue { attempts } => {
                log::debug!("salt search progress: {} attempts", attempts);
                on_progress(attempts);
            }
            BatchStep::Exhausted { attempts, next_nonce } => {
                on_progress(attempts);
                log::info!("no matching salt within {} attempts", attempts);
                return Ok(MiningOutcome::NotFound { attempts, next_nonce });
            }
        }
    }
}

pub fn mine(params: &MinerParams) -> Result<MiningOutcome, MinerError> {
    mine_with_progress(params, DEFAULT_BATCH_SIZE, &AtomicBool::new(false), |_| {})
}
