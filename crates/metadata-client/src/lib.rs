//! Service-discovery metadata store client
//!
//! A read-only client for the versioned metadata endpoint that reports the
//! set of containerized services: service/container enumeration, self-stack
//! lookup and version polling.
//!
//! # Example
//!
//! ```no_run
//! use metadata_client::{MetadataClient, MetadataClientTrait};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MetadataClient::new(
//!     "http://rancher-metadata/2016-07-29".to_string(),
//!     Duration::from_secs(30),
//! )?;
//!
//! // Wait for the store to come up, then enumerate services
//! client.wait_for_ready(30).await?;
//! let services = client.list_services().await?;
//! let version = client.version().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod metadata_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::MetadataClient;
pub use error::MetadataError;
pub use metadata_trait::MetadataClientTrait;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockMetadataClient;
