//! Load-balancer controller API client
//!
//! A Rust client for the controller's REST API, covering what the sync
//! controller needs: virtual-service and pool-group lookup, tenant/cloud
//! reference resolution, and the macro verb dispatch for composite
//! create/update/delete submissions.
//!
//! # Example
//!
//! ```no_run
//! use avi_client::{AviSession, AviClientTrait};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = AviSession::new(
//!     "https://avi-controller".to_string(),
//!     "admin".to_string(),
//!     "secret".to_string(),
//!     "18.2.9".to_string(),
//!     Duration::from_secs(30),
//!     false,
//! )?;
//!
//! let cloud_ref = session.resolve_cloud_ref("Default-Cloud").await?;
//! let existing = session.get_virtual_service_by_name("prod_web").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod session;
#[path = "trait.rs"]
pub mod avi_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use avi_trait::AviClientTrait;
pub use error::AviError;
pub use models::*;
pub use session::AviSession;
#[cfg(feature = "test-util")]
pub use mock::{MockAviClient, RecordedCall};
