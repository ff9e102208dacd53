//! # Agent Room Pay
//!
//! Payment relay for Agent Room event registrations.
//!
//! ## Usage
//!
//! ```bash
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export RAZORPAY_KEY_SECRET=...
//! export SHEET_WEBHOOK_URL=https://script.google.com/macros/s/.../exec
//!
//! agentroom-pay
//! ```
//!
//! Logs are JSON lines when `ENVIRONMENT=production`, plain text otherwise.
//! `RUST_LOG` overrides the default `info` filter.

use pay_api::{routes, state::AppState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::new()?;
    let addr = state.config.socket_addr()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %state.config.environment,
        provider = state.gateway.provider_name(),
        currency = %state.currency,
        sheet = state.forwarder.endpoint().unwrap_or("<not configured>"),
        "Starting Agent Room Pay"
    );

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Accepting POST /create-order and POST /verify-payment");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let production = std::env::var("ENVIRONMENT").is_ok_and(|env| env == "production");

    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
