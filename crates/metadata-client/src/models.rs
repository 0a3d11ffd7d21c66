//! Metadata store API models
//!
//! These models match the answers of the versioned metadata endpoint
//! (`/<version>/services`, `/<version>/self/stack`, `/<version>/version`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A logical service as reported by the metadata store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub stack_name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// A container instance belonging to a service.
///
/// `ports` entries use the store's `hostIP:hostPort:containerPort/protocol`
/// publish format and are parsed by the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub health_state: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

/// The stack the querying process itself belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Stack {
    pub name: String,
    #[serde(default)]
    pub environment_uuid: String,
}
