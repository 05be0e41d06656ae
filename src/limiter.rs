// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-IP sliding-window rate limiter for the contact endpoint.
//!
//! Each client IP keeps a log of request instants inside the current window.
//! A request is admitted while the log holds fewer than `max_requests`
//! entries; entries older than the window fall off the front.

use crate::config::RateLimitConfig;
use crate::handlers::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const RATELIMIT_LIMIT: &str = "ratelimit-limit";
const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
const RATELIMIT_RESET: &str = "ratelimit-reset";

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Requests left in the current window
        remaining: u32,
        /// Time until the oldest logged request leaves the window
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until a slot frees up
        retry_after: Duration,
    },
}

/// Thread-safe sliding-window rate limiter keyed by client IP.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<IpAddr, VecDeque<Instant>>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Record a request from `ip` and decide whether it may proceed.
    pub async fn check(&self, ip: IpAddr) -> RateLimitResult {
        self.check_at(ip, Instant::now()).await
    }

    async fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitResult {
        let window = self.config.window_duration();
        let mut windows = self.windows.write().await;
        let log = windows.entry(ip).or_default();
        prune(log, now, window);

        if log.len() >= self.config.max_requests as usize {
            let retry_after = log
                .front()
                .map(|oldest| window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(window);
            debug!(%ip, ?retry_after, "IP rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        log.push_back(now);
        let reset_in = log
            .front()
            .map(|oldest| window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(window);

        RateLimitResult::Allowed {
            remaining: self.config.max_requests.saturating_sub(log.len() as u32),
            reset_in,
        }
    }

    /// Drop clients with no requests inside the window.
    pub async fn cleanup(&self) {
        self.cleanup_at(Instant::now()).await
    }

    async fn cleanup_at(&self, now: Instant) {
        let window = self.config.window_duration();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, log| {
            prune(log, now, window);
            !log.is_empty()
        });
        let evicted = before - windows.len();
        if evicted > 0 {
            debug!(evicted, tracked = windows.len(), "Rate limiter cleanup");
        }
    }

    /// Number of client IPs currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.len()
    }
}

fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = log.front() {
        if now.duration_since(*oldest) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

/// Resolve the client IP from the socket peer, or from the first
/// `X-Forwarded-For` hop when the service sits behind a trusted proxy.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    peer.map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Body of a 429 response.
#[derive(Debug, Serialize)]
pub struct RateLimitedResponse {
    pub success: bool,
    pub error: String,
    #[serde(rename = "retryAfter")]
    pub retry_after: String,
}

/// Middleware applying the per-IP limit before the handler runs.
pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let config = state.limiter.config();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    if peer.is_none() {
        warn!("No peer address on request; rate limiting as unspecified");
    }
    let ip = client_ip(request.headers(), peer, config.trust_proxy);
    let limit = HeaderValue::from(config.max_requests);

    match state.limiter.check(ip).await {
        RateLimitResult::Allowed {
            remaining,
            reset_in,
        } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(RATELIMIT_LIMIT, limit);
            headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
            headers.insert(RATELIMIT_RESET, HeaderValue::from(ceil_secs(reset_in)));
            response
        }
        RateLimitResult::Limited { retry_after } => {
            state.metrics.record_rate_limited();
            info!(%ip, retry_after_secs = ceil_secs(retry_after), "Request rate limited");

            let window = config.window_description();
            let secs = ceil_secs(retry_after);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (RATELIMIT_LIMIT, limit),
                    (RATELIMIT_REMAINING, HeaderValue::from(0u32)),
                    (RATELIMIT_RESET, HeaderValue::from(secs)),
                    ("retry-after", HeaderValue::from(secs)),
                ],
                Json(RateLimitedResponse {
                    success: false,
                    error: format!("Too many requests from this IP. Please try again in {window}."),
                    retry_after: window,
                }),
            )
                .into_response()
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
