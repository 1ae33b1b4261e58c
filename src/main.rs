//! Relayer entry point.
//!
//! Startup order: `.env`, flags, configuration, logging, sender key, data
//! directory, status server, pipeline. The process runs until SIGINT/SIGTERM
//! or until a stage panic is propagated.
use std::sync::Arc;

use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use offchain_relayer::{
    bootstrap::{initialize_pipeline, initialize_status_server},
    config::{RelayArgs, RelayConfig},
    logging::setup_logging,
    services::{ReadinessTracker, RelayerKey},
    utils::log_service_info,
};

const DEV_MODE_BANNER: &str = r#"
        +++++++++++++++++++++++++++++++++++++++++++++++++++
        |   NODE IS RUNNING IN INSECURE DEVELOPMENT MODE   |
        |                                                 |
        |     Do not use --unsafe-dev-mode in prod.       |
        +++++++++++++++++++++++++++++++++++++++++++++++++++
"#;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = RelayConfig::from_args(RelayArgs::parse())?;

    if config.unsafe_dev_mode {
        eprintln!("{DEV_MODE_BANNER}");
    }

    setup_logging(&config.log_level)?;
    log_service_info(&config);

    let key = RelayerKey::load(&config.key_source).wrap_err("failed to load sender key")?;
    info!(sender = %key.address(), "loaded sender key");

    if let Some(data_dir) = &config.data_dir {
        std::fs::create_dir_all(data_dir)
            .wrap_err_with(|| format!("failed to create data directory {}", data_dir.display()))?;
    }

    let readiness = Arc::new(ReadinessTracker::new());
    let cancel = CancellationToken::new();

    let status_server = match &config.status_addr {
        Some(addr) => {
            let server = initialize_status_server(addr, readiness.clone())?;
            let handle = server.handle();
            Some((handle, tokio::spawn(server)))
        }
        None => None,
    };

    let supervisor = initialize_pipeline(&config, key, readiness, cancel.clone())?;
    let pipeline = supervisor.wait();
    tokio::pin!(pipeline);

    let outcome = tokio::select! {
        result = &mut pipeline => result,
        _ = shutdown_signal() => {
            info!("shutting down");
            cancel.cancel();
            pipeline.await
        }
    };

    if let Some((handle, task)) = status_server {
        handle.stop(true).await;
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "status server stopped with an error"),
            Err(e) => warn!(error = %e, "status server task failed"),
        }
    }

    outcome?;
    info!("relayer stopped");
    Ok(())
}
