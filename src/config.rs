use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Used when neither the updater nor its configuration name a timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings an `EndpointUpdater` is built from.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Server root, e.g. `http://localhost:9090`.
    pub base_url: String,

    /// Applied whenever the per-updater timeout is zero. Zero here falls back to
    /// [`DEFAULT_TIMEOUT`].
    pub default_timeout: Duration,

    /// Report non-2xx responses as `UpdateError::ServerRejected` instead of success.
    pub reject_error_status: bool,
}

impl UpdaterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        UpdaterConfig {
            base_url: base_url.into(),
            default_timeout: DEFAULT_TIMEOUT,
            reject_error_status: false,
        }
    }

    pub(crate) fn effective_default_timeout(&self) -> Duration {
        if self.default_timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.default_timeout
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// What `sd-push` needs to perform one update.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub updater: UpdaterConfig,
    pub job: String,
    pub targets_file: PathBuf,
    pub timeout: Option<Duration>,
}

impl PushConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let timeout = match lookup("SD_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: f64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "SD_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                let timeout =
                    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::Invalid {
                        name: "SD_TIMEOUT_SECS",
                        value: raw.clone(),
                    })?;
                Some(timeout)
            }
            None => None,
        };

        let reject_error_status = match lookup("SD_REJECT_ERROR_STATUS") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SD_REJECT_ERROR_STATUS",
                        value: raw,
                    })
                }
            },
            None => false,
        };

        let mut updater = UpdaterConfig::new(required("SD_URL")?);
        updater.reject_error_status = reject_error_status;

        Ok(PushConfig {
            updater,
            job: required("SD_JOB")?,
            targets_file: PathBuf::from(required("SD_TARGETS_FILE")?),
            timeout,
        })
    }
}
