// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio contact form API
//!
//! Accepts contact form submissions over HTTP and turns each one into two
//! emails: a notification to the site operator and an auto-reply to the
//! submitter.
//!
//! - Input sanitization and ordered validation
//! - HTML and plain-text templating with matching field values
//! - Concurrent SMTP dispatch with classified transport errors
//! - Per-IP sliding-window rate limiting on the contact endpoint
//! - Token-gated mail diagnostics and Prometheus metrics

pub mod composer;
pub mod config;
pub mod debug;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod sanitizer;
pub mod smtp;
pub mod validator;

pub use config::Config;
pub use dispatcher::{Dispatcher, Mailer};
pub use error::{ApiError, DispatchError, ValidationError};
pub use handlers::AppState;
pub use limiter::{RateLimitResult, RateLimiter};
pub use routes::build_router;
pub use smtp::SmtpMailer;
