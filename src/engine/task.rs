use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::miner::{mine_with_progress, MinerParams, MiningOutcome};
use crate::error::MinerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MiningProgress {
    pub attempts: u64,
    pub max_attempts: u64,
}

/// Handle to a salt search running on tokio's blocking pool.
pub struct MiningTask {
    cancel: Arc<AtomicBool>,
    progress: mpsc::UnboundedReceiver<MiningProgress>,
    handle: JoinHandle<Result<MiningOutcome, MinerError>>,
}

pub fn spawn_mining(params: MinerParams, batch_size: u64) -> MiningTask {
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::unbounded_channel();

    let flag = cancel.clone();
    let handle = tokio::task::spawn_blocking(move || {
        let max_attempts = params.max_attempts;
        mine_with_progress(&params, batch_size, &flag, |attempts| {
            // nobody listening is fine
            let _ = tx.send(MiningProgress { attempts, max_attempts });
        })
    });

    MiningTask { cancel, progress: rx, handle }
}

impl MiningTask {
    /// Stops the search at the next batch boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Next progress report; `None` once the worker has finished.
    pub async fn next_progress(&mut self) -> Option<MiningProgress> {
        self.progress.recv().await
    }

    pub async fn finish(self) -> Result<MiningOutcome, MinerError> {
        self.handle
            .await
            .map_err(|e| MinerError::Worker(e.to_string()))?
    }
}
