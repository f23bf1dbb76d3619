//! Sync command handlers

use anyhow::{bail, Result};
use tokio::time::{interval, Duration};
use tracing::debug;

use epigram_core::sync::{RemoteClient, SyncEngine, SyncOutcome};
use epigram_core::QuoteStore;

use crate::output::Output;

/// Run one sync cycle against the quote server
pub async fn sync(store: &mut QuoteStore, output: &Output) -> Result<()> {
    let engine = build_engine(store)?;

    output.message("Syncing…");
    run_cycle(&engine, store, output).await
}

/// Sync on the configured interval until interrupted
///
/// A failed cycle prints the failure notice and is retried on the next
/// tick; the loop only ends with the process.
pub async fn watch(store: &mut QuoteStore, output: &Output) -> Result<()> {
    let engine = build_engine(store)?;
    let every = store.config().sync_interval_secs.max(1);

    output.message(&format!(
        "Syncing every {} seconds. Press Ctrl-C to stop.",
        every
    ));

    let mut ticker = interval(Duration::from_secs(every));
    loop {
        ticker.tick().await;
        let _ = run_cycle(&engine, store, output).await;
    }
}

fn build_engine(store: &QuoteStore) -> Result<SyncEngine> {
    let config = store.config();

    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             epigram config set sync_enabled true"
        );
    }

    Ok(SyncEngine::new(RemoteClient::from_config(config)?))
}

async fn run_cycle(engine: &SyncEngine, store: &mut QuoteStore, output: &Output) -> Result<()> {
    match engine.sync_once(store).await {
        Ok(SyncOutcome::Completed(summary)) => {
            output.success(&format!("Synced: {}", summary));
            Ok(())
        }
        Ok(SyncOutcome::SkippedInFlight) => {
            output.message("A sync cycle is already running.");
            Ok(())
        }
        Err(e) => {
            debug!("sync cycle failed: {:#}", e);
            output.message("Sync failed. Please try again.");
            Err(e)
        }
    }
}
