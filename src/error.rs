use std::time::Duration;

use reqwest::{StatusCode, Url};
use thiserror::Error;

/// Target groups could not be turned into (or read back from) the JSON wire format.
#[derive(Debug, Error)]
#[error("target group payload: {0}")]
pub struct EncodeError(#[from] pub(crate) serde_json::Error);

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to encode target groups: {0}")]
    Encode(#[from] EncodeError),

    #[error("failed to build request for job {job:?}: {reason}")]
    RequestConstruction { job: String, reason: String },

    #[error("PUT {url} failed: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("PUT {url} timed out after {after:?}")]
    Timeout { url: Url, after: Duration },

    #[error("PUT {url} rejected by server with status {status}")]
    ServerRejected { url: Url, status: StatusCode },
}

impl UpdateError {
    /// True for both the racing timer firing and a transport-level timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            UpdateError::Timeout { .. } => true,
            UpdateError::Network { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}
