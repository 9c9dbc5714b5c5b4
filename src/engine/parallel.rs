use rayon::prelude::*;

use crate::engine::miner::{MinedSalt, MinerParams, MiningOutcome};
use crate::error::MinerError;

/// Multi-core salt search. `find_first` keeps the lowest matching offset, so the
/// answer is the one [`crate::engine::miner::mine`] would give.
pub fn mine_parallel(params: &MinerParams) -> Result<MiningOutcome, MinerError> {
    let limit = params.searchable_attempts();
    log::debug!(
        "parallel salt search over {} candidates on {} threads",
        limit,
        rayon::current_num_threads()
    );

    let hit = (0..limit)
        .into_par_iter()
        .find_first(|offset| {
            let (_, _, address) = params.candidate(*offset);
            params.mask.matches(address)
        });

    match hit {
        Some(offset) => {
            let (nonce, salt, address) = params.candidate(offset);
            log::info!("found hook address {:?} with salt nonce {} after {} attempts", address, nonce, offset);
            Ok(MiningOutcome::Found(MinedSalt { salt, address, nonce, attempts: offset }))
        }
        None => {
            log::info!("no matching salt within {} attempts", limit);
            Ok(MiningOutcome::NotFound {
                attempts: limit,
                next_nonce: params.start_nonce.saturating_add(limit.into()),
            })
        }
    }
}
