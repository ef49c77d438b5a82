//! Session shutdown helpers.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use shelfsync_core::ReconciliationEngine;

/// Run `work` unless `interrupt` fires first. `None` when interrupted.
pub async fn until_interrupted<W, I>(work: W, interrupt: I) -> Option<W::Output>
where
    W: Future,
    I: Future,
{
    tokio::select! {
        output = work => Some(output),
        _ = interrupt => {
            info!("Interrupted");
            None
        }
    }
}

/// End the session and wait up to `wait` for the saved ids to reach disk,
/// then hand back how the interactive loop ended.
///
/// The cache write happens whether or not the loop failed.
pub async fn finish_session(
    engine: ReconciliationEngine,
    outcome: Result<()>,
    wait: Duration,
) -> Result<()> {
    if let Err(e) = &outcome {
        warn!("Session loop failed, saving before exit: {:#}", e);
    }

    info!("Ending session");
    match tokio::time::timeout(wait, engine.end_session().wait()).await {
        Ok(Ok(ids)) => info!("Session ended, {} saved ids on disk", ids.len()),
        Ok(Err(e)) => warn!("Saved ids were not persisted: {}", e),
        Err(_) => warn!("Timed out waiting for saved ids to persist"),
    }

    outcome
}
