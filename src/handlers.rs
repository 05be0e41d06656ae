// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact form service.
//!
//! `POST /api/contact` moves through validate, compose and dispatch; a
//! validation failure answers 400 before anything is composed, a dispatch
//! failure answers 500 with a message chosen by error class.

use crate::composer::{compose, format_received_at, ComposeContext};
use crate::config::Config;
use crate::dispatcher::{Dispatcher, Mailer};
use crate::error::ApiError;
use crate::limiter::RateLimiter;
use crate::metrics::{Metrics, Outcome};
use crate::models::ContactSubmission;
use crate::routes::API_ENDPOINTS;
use crate::validator::validate;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const SERVICE_NAME: &str = "Portfolio Contact Form API";
pub const SUCCESS_MESSAGE: &str =
    "Message sent successfully! You should receive a confirmation email shortly.";

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub limiter: RateLimiter,
    pub metrics: Arc<Metrics>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire a dispatcher, limiter and metrics registry around `mailer`.
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Result<Self, prometheus::Error> {
        let metrics = Arc::new(Metrics::new()?);
        Ok(Self {
            dispatcher: Dispatcher::new(mailer).with_metrics(metrics.clone()),
            limiter: RateLimiter::new(config.rate_limit.clone()),
            metrics,
            config,
            started_at: Instant::now(),
        })
    }

    pub(crate) fn expose_details(&self) -> bool {
        self.config.environment.is_development()
    }
}

/// Successful contact response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
    /// Seconds since startup
    pub uptime: f64,
    pub environment: &'static str,
    pub version: &'static str,
}

/// Capability listing.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub success: bool,
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointListing,
    #[serde(rename = "rateLimit")]
    pub rate_limit: RateLimitListing,
}

#[derive(Debug, Serialize)]
pub struct EndpointListing {
    pub health: &'static str,
    pub contact: &'static str,
    pub info: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RateLimitListing {
    #[serde(rename = "windowMs")]
    pub window: String,
    pub max: u32,
}

/// Contact form submission.
///
/// The body is parsed here rather than through the `Json` extractor so that
/// any unreadable body gets the service's own error shape. An empty body
/// counts as an empty submission.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Contact request body not read"
        );
        state.metrics.record_submission(Outcome::Rejected);
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest("Invalid request body".to_string())
        }
    })?;

    let submission: ContactSubmission = if body.iter().all(u8::is_ascii_whitespace) {
        ContactSubmission::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Unreadable contact request body");
            state.metrics.record_submission(Outcome::Rejected);
            ApiError::BadRequest("Invalid request body".to_string())
        })?
    };

    let sanitized = validate(&submission).map_err(|e| {
        info!(reason = %e, "Contact submission rejected");
        state.metrics.record_submission(Outcome::Rejected);
        ApiError::from(e)
    })?;

    let ctx = ComposeContext {
        mail: &state.config.mail,
        profile: &state.config.profile,
        received_at: Utc::now(),
    };
    let (notification, auto_reply) = compose(&sanitized, &ctx);

    if let Err(error) = state
        .dispatcher
        .send_batch(&notification, &auto_reply)
        .await
    {
        state.metrics.record_submission(Outcome::Failed);
        return Err(ApiError::Dispatch {
            error,
            expose_details: state.expose_details(),
        });
    }

    state.metrics.record_submission(Outcome::Accepted);
    info!(
        name = %sanitized.name,
        email = %sanitized.email,
        subject = %sanitized.subject,
        received_at = %format_received_at(ctx.received_at, &state.config.profile),
        "Contact form submission processed"
    );

    Ok(Json(ContactResponse {
        success: true,
        message: SUCCESS_MESSAGE,
    }))
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Contact form API is running smoothly",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.environment.as_str(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Static capability listing.
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        success: true,
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointListing {
            health: API_ENDPOINTS[0],
            contact: "/api/contact (POST)",
            info: API_ENDPOINTS[2],
        },
        rate_limit: RateLimitListing {
            window: state.config.rate_limit.window_description(),
            max: state.config.rate_limit.max_requests,
        },
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state.metrics.render().map_err(|e| ApiError::Internal {
        message: e.to_string(),
        expose_details: state.expose_details(),
    })?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Unmatched routes: API paths list the available endpoints.
pub async fn fallback(uri: Uri) -> ApiError {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        ApiError::ApiNotFound
    } else {
        ApiError::RouteNotFound
    }
}
