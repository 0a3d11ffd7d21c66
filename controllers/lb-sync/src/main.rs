//! lb-sync controller
//!
//! Keeps a load-balancer controller's virtual services in sync with the
//! containerized services reported by a service-discovery metadata store:
//! scan the metadata snapshot into desired-state records, build the matching
//! virtual-service configuration, and create/update/delete on the
//! controller, pruning objects that are no longer desired.

mod backoff;
mod builder;
mod checksum;
mod config;
mod controller;
mod error;
mod health;
mod labels;
mod overrides;
mod reconciler;
mod record;
mod scanner;
mod watcher;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod builder_test;

use crate::config::SyncConfig;
use crate::controller::Controller;
use crate::error::ControllerError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("starting lb-sync controller");

    let cfg = SyncConfig::from_env()?;
    info!("configuration:");
    info!("  controller: {}", cfg.controller_url);
    info!("  tenant: {} cloud: {}", cfg.tenant, cfg.cloud_name);
    info!("  metadata store: {}", cfg.metadata_url);
    info!("  healthcheck: {}", cfg.healthcheck_addr);
    info!(
        "  poll {:?}, refresh floor {:?}, http timeout {:?}",
        cfg.poll_interval, cfg.full_sync_interval, cfg.http_timeout
    );

    let controller = Controller::new(cfg).await?;
    controller.run().await
}
