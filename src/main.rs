// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Form Service
//!
//! Serves `POST /api/contact`, `GET /api/health` and `GET /api/info`, with
//! `GET /api/debug` and a Prometheus endpoint when configured.
//!
//! ## Configuration
//!
//! Read from the environment, optionally seeded by a `.env` file:
//!
//! - `EMAIL_USER`, `EMAIL_PASS`: mail account (required)
//! - `WORK_EMAIL`: where notifications go (default: `EMAIL_USER`)
//! - `PORT` / `BIND_ADDR`: listen address (default: 0.0.0.0:3001)
//! - `FRONTEND_URL`: comma separated allowed origins
//! - `RATE_LIMIT_MAX`, `RATE_LIMIT_WINDOW_SECS`: default 10 per 15 minutes
//! - `APP_ENV`: `development` exposes error details (default: production)
//! - `DEBUG_TOKEN`: enables `/api/debug`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_form_api::{build_router, AppState, Config, SmtpMailer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        bind_addr = %config.bind_addr,
        environment = %config.environment,
        sender = %config.mail.sender_address(),
        notify = %config.mail.notification_address(),
        smtp_host = %config.mail.smtp_host,
        allowed_origins = ?config.cors.allowed_origins,
        rate_limit_max = config.rate_limit.max_requests,
        rate_limit_window = %config.rate_limit.window_description(),
        debug_endpoint = config.debug.token.is_some(),
        "Starting contact form API"
    );

    let mailer = Arc::new(SmtpMailer::new(&config.mail)?);
    let state = Arc::new(AppState::new(config, mailer)?);

    // A failed check is logged by the dispatcher; the service still starts.
    if state.dispatcher.verify().await.is_err() {
        warn!("Mail transport not verified; contact submissions may fail");
    }

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup().await;
        }
    });

    let addr: SocketAddr = state.config.bind_addr.parse()?;
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down gracefully"),
        _ = terminate => info!("SIGTERM received, shutting down gracefully"),
    }
}
