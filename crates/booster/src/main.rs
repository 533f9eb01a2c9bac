use booster::cli::Cli;
use booster::prelude::*;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), BoosterError> {
    let cli = Cli::parse();
    let config = BoosterConfig::from_sources(&cli)?;

    // RUST_LOG wins over the configured level.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .map_err(|e| BoosterError::Setup(format!("invalid log level: {e}")))?;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()
        .map_err(|e| BoosterError::Setup(e.to_string()))?;

    tracing::info!(
        account = config.account_label(),
        data_dir = %config.data_dir.display(),
        proxy = config.socks5.is_some(),
        remember_session = config.remember_session,
        "booster starting"
    );

    let port = LogPresence::new(config.account_label());
    let service = GamesService::new(port, config.service_config());

    let lifetime = CancellationToken::new();
    let supervisor = service.start(lifetime.clone()).await?;

    if let Err(e) = service.update(&config.app_ids).await {
        // The set is stored; the heartbeat keeps retrying it.
        tracing::warn!(error = %e, "initial declare failed");
    }

    let shutdown = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown requested");
    lifetime.cancel();
    if let Err(e) = supervisor.await {
        tracing::error!(error = %e, "shutdown task failed");
    }

    shutdown.map_err(|e| BoosterError::Setup(format!("signal handler: {e}")))
}
