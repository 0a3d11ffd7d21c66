//! Metadata version watcher
//!
//! This module drives the reconciliation cadence: wake on a short interval,
//! read the metadata version token, and run a full pass only when the token
//! changed or when no pass has completed within the refresh floor. The
//! floor guards against missed or coalesced change notifications.
//!
//! The loop observes the shutdown signal between cycles and inside every
//! sleep; a controller call that is already in flight is never interrupted.

use crate::config::SyncConfig;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use metadata_client::MetadataClientTrait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Watches the metadata version token and triggers reconciliation.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    metadata: Arc<dyn MetadataClientTrait>,
    cfg: Arc<SyncConfig>,
    shutdown: watch::Receiver<bool>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        reconciler: Arc<Reconciler>,
        metadata: Arc<dyn MetadataClientTrait>,
        cfg: Arc<SyncConfig>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            reconciler,
            metadata,
            cfg,
            shutdown,
        }
    }

    /// Runs the poll loop until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!(
            "starting metadata version watcher (poll {:?}, refresh floor {:?})",
            self.cfg.poll_interval, self.cfg.full_sync_interval
        );

        let mut version = "init".to_string();
        let mut last_synced: Option<Instant> = None;

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            let mut update = false;
            match self.metadata.version().await {
                Ok(new_version) if new_version != version => {
                    info!(
                        "metadata version changed (old {}, new {})",
                        version, new_version
                    );
                    version = new_version;
                    update = true;
                }
                Ok(_) => {
                    debug!("no change in metadata version");
                    let stale = last_synced
                        .map(|t| t.elapsed() >= self.cfg.full_sync_interval)
                        .unwrap_or(true);
                    if stale {
                        info!(
                            "no pass within the last {:?}; forcing full sync",
                            self.cfg.full_sync_interval
                        );
                        update = true;
                    }
                }
                Err(e) => error!("error reading metadata version: {}", e),
            }

            if update {
                match self.reconciler.sync_pass().await {
                    Ok(()) => {
                        last_synced = Some(Instant::now());
                    }
                    // The pass is retried on the next qualifying tick; the
                    // remote fingerprints were never advanced.
                    Err(e) => error!("sync pass aborted: {}", e),
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.cfg.poll_interval) => {}
                _ = self.shutdown.changed() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        info!("metadata version watcher stopped");
        Ok(())
    }
}
