use chat_relay::{make_app, Config};
use std::{error::Error, net::SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "chat_relay=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // a missing .env file is fine, the defaults apply
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let addr: SocketAddr = config.server_addr.parse()?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("relay listening on {}", listener.local_addr()?);

    axum::serve(listener, make_app(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("relay stopped");
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received, draining connections");
}
