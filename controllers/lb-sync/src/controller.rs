//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires configuration,
//! both API clients, the reconciler and the two long-lived tasks together:
//! the metadata version watcher driving reconciliation and the health
//! endpoint. Everything is constructed here once and passed down
//! explicitly; there is no ambient global state.

use crate::config::SyncConfig;
use crate::error::ControllerError;
use crate::health::{self, HealthState};
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use avi_client::{AviClientTrait, AviSession};
use metadata_client::{MetadataClient, MetadataClientTrait};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Attempts (one per second) to wait for the metadata store at startup.
const METADATA_STARTUP_ATTEMPTS: u32 = 60;

/// Main controller for virtual-service synchronization.
pub struct Controller {
    watcher: JoinHandle<Result<(), ControllerError>>,
    health: JoinHandle<Result<(), ControllerError>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// Validates controller connectivity by resolving the configured cloud
    /// (the resolved reference is reused by the builder) and waits for the
    /// metadata store; failure of either is fatal at startup.
    pub async fn new(cfg: SyncConfig) -> Result<Self, ControllerError> {
        info!("initializing lb-sync controller");
        let cfg = Arc::new(cfg);

        let session = AviSession::new(
            cfg.controller_url.clone(),
            cfg.username.clone(),
            cfg.password.clone(),
            cfg.api_version.clone(),
            cfg.http_timeout,
            cfg.insecure,
        )?;
        let avi: Arc<dyn AviClientTrait> = Arc::new(session);

        info!("validating controller connectivity...");
        let cloud_ref = avi.resolve_cloud_ref(&cfg.cloud_name).await.map_err(|e| {
            error!("failed to resolve cloud '{}': {}", cfg.cloud_name, e);
            error!("please ensure:");
            error!("  1. AVI_CONTROLLER_URL points at a reachable controller");
            error!("  2. AVI_USERNAME/AVI_PASSWORD are valid");
            error!("  3. the cloud '{}' exists on the controller", cfg.cloud_name);
            e
        })?;
        info!("controller configuration OK (cloud ref {})", cloud_ref);

        info!("initializing metadata client");
        let metadata_client = MetadataClient::new(cfg.metadata_url.clone(), cfg.http_timeout)?;
        metadata_client
            .wait_for_ready(METADATA_STARTUP_ATTEMPTS)
            .await?;
        let metadata: Arc<dyn MetadataClientTrait> = Arc::new(metadata_client);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&metadata),
            Arc::clone(&avi),
            Arc::clone(&cfg),
            cloud_ref,
        ));

        let watcher = {
            let watcher = Watcher::new(
                reconciler,
                Arc::clone(&metadata),
                Arc::clone(&cfg),
                shutdown_rx.clone(),
            );
            tokio::spawn(watcher.run())
        };

        let health = {
            let state = HealthState {
                metadata,
                avi,
                cloud_name: cfg.cloud_name.clone(),
            };
            tokio::spawn(health::serve(
                cfg.healthcheck_addr.clone(),
                state,
                shutdown_rx,
            ))
        };

        Ok(Self {
            watcher,
            health,
            shutdown_tx,
        })
    }

    /// Runs the controller until interrupted or a task exits.
    ///
    /// On interrupt the shutdown signal is broadcast and both tasks are
    /// awaited, letting an in-flight cycle finish its current controller
    /// call before the process exits.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("lb-sync controller running");
        let Self {
            mut watcher,
            mut health,
            shutdown_tx,
        } = self;

        let mut watcher_done = false;
        let mut health_done = false;
        let outcome;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received interrupt, shutting down");
                outcome = Ok(());
            }
            result = &mut watcher => {
                watcher_done = true;
                outcome = flatten(result, "watcher");
            }
            result = &mut health => {
                health_done = true;
                outcome = flatten(result, "health endpoint");
            }
        }

        let _ = shutdown_tx.send(true);
        outcome?;
        if !watcher_done {
            join(watcher, "watcher").await?;
        }
        if !health_done {
            join(health, "health endpoint").await?;
        }

        info!("lb-sync controller stopped");
        Ok(())
    }
}

async fn join(
    handle: JoinHandle<Result<(), ControllerError>>,
    name: &str,
) -> Result<(), ControllerError> {
    flatten(handle.await, name)
}

fn flatten(
    result: Result<Result<(), ControllerError>, tokio::task::JoinError>,
    name: &str,
) -> Result<(), ControllerError> {
    result.map_err(|e| ControllerError::Task(format!("{} panicked: {}", name, e)))?
}
