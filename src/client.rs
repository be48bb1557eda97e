use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::UpdaterConfig;
use crate::error::UpdateError;
use crate::sd::{self, TargetGroup};

/// Result of a dispatched update. Any response counts as delivered unless the
/// updater was configured with `reject_error_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub status: StatusCode,
}

/// Replaces the target groups a monitoring server stores for a job.
///
/// Each call to [`EndpointUpdater::update_endpoints`] is one PUT to
/// `<base_url>/api/jobs/<job>/targets`, bounded as a whole by the active
/// timeout. When the timer wins, the request future is dropped, which cancels
/// it and releases its connection.
#[derive(Debug)]
pub struct EndpointUpdater {
    config: UpdaterConfig,
    // Nanoseconds; zero selects the configured default.
    timeout_nanos: AtomicU64,
    client: Client,
}

impl EndpointUpdater {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(UpdaterConfig::new(base_url))
    }

    pub fn with_config(config: UpdaterConfig) -> Self {
        EndpointUpdater {
            config,
            timeout_nanos: AtomicU64::new(0),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Applies from the next call on. `Duration::ZERO` restores the default.
    pub fn set_timeout(&self, timeout: Duration) {
        let nanos = u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX);
        self.timeout_nanos.store(nanos, Ordering::Relaxed);
    }

    /// The timeout the next call will run under.
    pub fn timeout(&self) -> Duration {
        match self.timeout_nanos.load(Ordering::Relaxed) {
            0 => self.config.effective_default_timeout(),
            nanos => Duration::from_nanos(nanos),
        }
    }

    /// Build the job's targets URL, pushing `job` as a single percent-encoded
    /// path segment below whatever path the base URL already carries.
    ///
    /// `.` and `..` are refused: URL normalization drops dot segments, even
    /// percent-encoded ones, so they cannot name a job in a path.
    pub fn targets_url(&self, job: &str) -> Result<Url, UpdateError> {
        let construction = |reason: String| UpdateError::RequestConstruction {
            job: job.to_string(),
            reason,
        };

        if job == "." || job == ".." {
            return Err(construction("job name cannot be a dot segment".to_string()));
        }

        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            construction(format!("invalid base url {:?}: {e}", self.config.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                construction(format!(
                    "base url {:?} cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["api", "jobs", job, "targets"]);

        Ok(url)
    }

    /// Replace every target group stored for `job` with `groups`.
    ///
    /// An empty `groups` clears the job. The payload is encoded before any
    /// connection is made, so encode and URL errors never touch the network.
    #[instrument(skip(self, groups), fields(groups = groups.len()))]
    pub async fn update_endpoints(
        &self,
        job: &str,
        groups: &[TargetGroup],
    ) -> Result<UpdateOutcome, UpdateError> {
        let url = self.targets_url(job)?;
        let body = sd::encode(groups)?;
        let timeout = self.timeout();

        debug!("PUT {} ({} bytes, timeout {:?})", url, body.len(), timeout);
        trace!("{}", String::from_utf8_lossy(&body));

        let request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send();

        let response = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                warn!("PUT {} failed: {}", url, source);
                return Err(UpdateError::Network { url, source });
            }
            Err(_) => {
                warn!("PUT {} timed out after {:?}", url, timeout);
                return Err(UpdateError::Timeout {
                    url,
                    after: timeout,
                });
            }
        };

        let status = response.status();
        if self.config.reject_error_status && !status.is_success() {
            warn!("PUT {} rejected with {}", url, status);
            return Err(UpdateError::ServerRejected { url, status });
        }

        info!("Updated targets for job {} ({})", job, status);
        Ok(UpdateOutcome { status })
    }
}
