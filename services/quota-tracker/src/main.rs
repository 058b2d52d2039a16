use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use chat_quota_tracker::{build_policy, create_router, ApiState, QuotaTrackerConfig, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    let config = QuotaTrackerConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config);

    let host = config.server_host.clone();
    let port = config.server_port;

    info!(
        host = %host,
        port,
        data_dir = %config.data_dir.display(),
        backend = ?config.storage_backend,
        monthly_message_limit = config.monthly_message_limit,
        "starting chat-quota-tracker service"
    );

    let policy = Arc::new(
        build_policy(&config, Arc::new(SystemClock)).context("failed to open usage storage")?,
    );

    match policy.status().await {
        Ok(usage) => info!(
            period = %usage.period,
            count = usage.count,
            remaining = usage.remaining,
            "restored chat usage"
        ),
        Err(err) => warn!(error = %err, "failed to read chat usage at startup"),
    }

    let state = Arc::new(ApiState::new(Arc::clone(&policy), config));
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("invalid server bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;
    info!(local_addr = %listener.local_addr()?, "chat-quota-tracker listening");

    serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server encountered an unrecoverable error")?;

    info!("chat-quota-tracker service shutting down");
    Ok(())
}

fn init_tracing(config: &QuotaTrackerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
