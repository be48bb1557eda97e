use std::fs;
use std::process::ExitCode;

use sd_client::{decode, EndpointUpdater, PushConfig};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match push().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[instrument]
async fn push() -> Result<(), Box<dyn std::error::Error>> {
    let config = PushConfig::new_from_env()?;

    let raw = fs::read(&config.targets_file)
        .map_err(|e| format!("failed to read {}: {}", config.targets_file.display(), e))?;
    let groups = decode(&raw)?;

    info!(
        "Pushing {} target groups for job {} to {}",
        groups.len(),
        config.job,
        config.updater.base_url
    );

    let updater = EndpointUpdater::with_config(config.updater);
    if let Some(timeout) = config.timeout {
        updater.set_timeout(timeout);
    }

    let outcome = updater.update_endpoints(&config.job, &groups).await?;
    info!("Server answered {}", outcome.status);

    Ok(())
}
