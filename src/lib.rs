//! Client for managing the scrape targets a Prometheus-style server stores per job.
//!
//! To replace the target groups of a job:
//!
//! ```no_run
//! use std::time::Duration;
//! use sd_client::{EndpointUpdater, TargetGroup};
//!
//! # async fn run() -> Result<(), sd_client::UpdateError> {
//! let updater = EndpointUpdater::new("http://localhost:8080");
//! updater.set_timeout(Duration::from_secs(2));
//! updater
//!     .update_endpoints(
//!         "job-name",
//!         &[
//!             TargetGroup::new(
//!                 [("label1", "value1"), ("label2", "value2")],
//!                 [
//!                     "http://example.com:8080/metrics.json",
//!                     "http://example.com:8081/metrics.json",
//!                 ],
//!             ),
//!             TargetGroup::new(
//!                 [("label3", "value3")],
//!                 [
//!                     "http://example.com:8082/metrics.json",
//!                     "http://example.com:8083/metrics.json",
//!                 ],
//!             ),
//!         ],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod sd;

pub use client::{EndpointUpdater, UpdateOutcome};
pub use config::{ConfigError, PushConfig, UpdaterConfig, DEFAULT_TIMEOUT};
pub use error::{EncodeError, UpdateError};
pub use sd::{decode, encode, TargetGroup};
