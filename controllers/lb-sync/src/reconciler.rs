//! Reconciliation logic
//!
//! Drives the controller towards the scanned desired state. Per service the
//! decision is three-way: no remote object means create, a fingerprint
//! mismatch means update, a match means nothing to do. Afterwards every
//! remote virtual service owned by this controller but absent from the
//! desired set is deleted.
//!
//! Apply failures are logged and left for the next cycle: the remote
//! fingerprint was never updated, so the same service shows up as a
//! mismatch again.

use crate::builder::{ConfigBuilder, CREATED_BY};
use crate::checksum;
use crate::config::SyncConfig;
use crate::error::ControllerError;
use crate::record::ServiceRecord;
use crate::scanner;
use avi_client::{AviClientTrait, VirtualService};
use metadata_client::MetadataClientTrait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Path of the composite create/update/delete endpoint.
const MACRO_PATH: &str = "/api/macro";

/// Reconciles virtual services against the desired state.
pub struct Reconciler {
    metadata: Arc<dyn MetadataClientTrait>,
    avi: Arc<dyn AviClientTrait>,
    cfg: Arc<SyncConfig>,
    builder: ConfigBuilder,
}

impl Reconciler {
    pub fn new(
        metadata: Arc<dyn MetadataClientTrait>,
        avi: Arc<dyn AviClientTrait>,
        cfg: Arc<SyncConfig>,
        cloud_ref: String,
    ) -> Self {
        let builder = ConfigBuilder::new(Arc::clone(&avi), Arc::clone(&cfg), cloud_ref);
        Self {
            metadata,
            avi,
            cfg,
            builder,
        }
    }

    /// Run one full scan/apply/prune pass.
    ///
    /// A scan failure aborts the pass; apply and prune are best-effort per
    /// service.
    pub async fn sync_pass(&self) -> Result<(), ControllerError> {
        let records = scanner::scan(self.metadata.as_ref(), &self.cfg).await?;
        debug!("scanned {} desired service(s)", records.len());
        self.apply(&records).await;
        self.prune(&records).await;
        Ok(())
    }

    /// Converge every desired record, one controller call at a time.
    async fn apply(&self, records: &BTreeMap<String, ServiceRecord>) {
        for (name, record) in records {
            match self.avi.get_virtual_service_by_name(name).await {
                Ok(Some(existing)) => {
                    let desired_sum = checksum::fingerprint(record);
                    if existing.cloud_config_cksum.as_deref() == Some(desired_sum.as_str()) {
                        debug!("virtual service {} is up to date", name);
                        continue;
                    }
                    info!(
                        "fingerprint changed for {} (remote {:?}, desired {})",
                        name, existing.cloud_config_cksum, desired_sum
                    );
                    self.apply_one(record, false, Some(&existing)).await;
                }
                Ok(None) => {
                    info!("virtual service {} does not exist yet", name);
                    self.apply_one(record, true, None).await;
                }
                Err(e) => {
                    error!(
                        "failed to look up virtual service {}: {}; will retry next cycle",
                        name, e
                    );
                }
            }
        }
    }

    /// Build and submit one create or update call.
    async fn apply_one(&self, record: &ServiceRecord, create: bool, prior: Option<&VirtualService>) {
        let payload = match self.builder.build(record, create, prior).await {
            Ok(data) => macro_envelope(data),
            Err(e) => {
                error!(
                    "failed to build configuration for {}: {}",
                    record.service_name, e
                );
                return;
            }
        };

        let result = if create {
            self.avi.post(MACRO_PATH, &payload).await
        } else {
            self.avi.put(MACRO_PATH, &payload).await
        };

        match result {
            Ok(_) => info!(
                "virtual service {} {}",
                record.service_name,
                if create { "created" } else { "updated" }
            ),
            Err(e) => error!(
                "error {} virtual service {}: {}",
                if create { "creating" } else { "updating" },
                record.service_name,
                e
            ),
        }
    }

    /// Delete every owned virtual service that is no longer desired.
    async fn prune(&self, records: &BTreeMap<String, ServiceRecord>) {
        let remote = match self.avi.list_virtual_services().await {
            Ok(list) => list,
            Err(e) => {
                error!("failed to list virtual services for pruning: {}", e);
                return;
            }
        };

        for vs in remote {
            if vs.created_by.as_deref() != Some(CREATED_BY) {
                continue;
            }
            if records.contains_key(&vs.name) {
                continue;
            }
            let name = vs.name.clone();
            info!("deleting orphaned virtual service {}", name);
            let payload = match serde_json::to_value(&vs) {
                Ok(data) => macro_envelope(data),
                Err(e) => {
                    error!("failed to serialize virtual service {}: {}", name, e);
                    continue;
                }
            };
            match self.avi.delete(MACRO_PATH, &payload).await {
                Ok(()) => info!("virtual service {} deleted", name),
                Err(e) => error!("error deleting virtual service {}: {}", name, e),
            }
        }
    }
}

/// Wrap a virtual-service payload in the macro model envelope.
fn macro_envelope(data: Value) -> Value {
    json!({
        "model_name": "VirtualService",
        "data": data,
    })
}
