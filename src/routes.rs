// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Router assembly.

use crate::config::CorsConfig;
use crate::debug::debug_report;
use crate::error::ApiError;
use crate::handlers::{self, contact, fallback, health, service_info, AppState};
use crate::limiter::rate_limit;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Public API routes, as listed in 404 responses.
pub const API_ENDPOINTS: &[&str] = &["/api/health", "/api/contact", "/api/info"];

/// Build the application router.
///
/// The rate limiter wraps `POST /api/contact` only. `/api/debug` is mounted
/// only when a debug token is configured. A known path hit with the wrong
/// method answers like an unknown one.
pub fn build_router(state: Arc<AppState>) -> Router {
    let config = &state.config;

    let mut router = Router::new()
        .route(
            "/api/contact",
            post(contact).route_layer(middleware::from_fn_with_state(state.clone(), rate_limit)),
        )
        .route("/api/health", get(health))
        .route("/api/info", get(service_info));

    if config.debug.token.is_some() {
        router = router.route("/api/debug", get(debug_report));
    }

    if config.metrics.enabled {
        let path = config.metrics.path.as_str();
        if path.starts_with('/') && !path.starts_with("/api") {
            router = router.route(path, get(handlers::metrics));
        } else {
            warn!(path, "Metrics path must start with '/' and sit outside /api; not mounted");
        }
    }

    let expose_details = state.expose_details();
    let router = router
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_response(panic, expose_details)
        }));

    with_security_headers(router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors)),
        )
        .with_state(state)
}

/// A handler panic becomes the standard internal error body.
fn panic_response(panic: Box<dyn Any + Send + 'static>, expose_details: bool) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal {
        message,
        expose_details,
    }
    .into_response()
}

/// CORS for the configured frontend origins.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.trim().trim_end_matches('/').parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Applied when the handler has not set the header itself.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("cross-origin-opener-policy", "same-origin"),
];

fn with_security_headers(router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    SECURITY_HEADERS.iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        ))
    })
}
