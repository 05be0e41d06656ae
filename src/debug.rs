// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Operator diagnostics for the mail setup.
//!
//! `GET /api/debug` is only mounted when a debug token is configured and
//! requires `Authorization: Bearer <token>`. The report checks which mail
//! settings are present, verifies the transport, and, if verification
//! passed, sends one test message to the sender's own address.

use crate::config::{Config, Secret};
use crate::dispatcher::Dispatcher;
use crate::error::{ApiError, DispatchError};
use crate::handlers::AppState;
use crate::models::OutgoingMessage;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const NOT_SET: &str = "NOT SET";
const APP_PASSWORD_LEN: usize = 16;

/// Diagnostic report returned to the operator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub success: bool,
    pub timestamp: String,
    pub environment: EnvironmentCheck,
    pub transporter: StepResult,
    pub email_test: StepResult,
    pub recommendations: Vec<String>,
}

/// Which mail settings are present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EnvironmentCheck {
    pub email_user: bool,
    pub email_pass: bool,
    pub work_email: bool,
    pub email_user_value: String,
    pub work_email_value: String,
    pub email_pass_length: usize,
}

impl EnvironmentCheck {
    pub fn from_config(config: &Config) -> Self {
        let mail = &config.mail;
        Self {
            email_user: !mail.username.is_empty(),
            email_pass: !mail.password.is_empty(),
            work_email: mail.operator_address.is_some(),
            email_user_value: value_or_not_set(Some(mail.username.as_str())),
            work_email_value: value_or_not_set(mail.operator_address.as_deref()),
            email_pass_length: mail.password.len(),
        }
    }
}

fn value_or_not_set(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SET.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepStatus {
    Ok,
    Success,
    Error,
    Skipped,
}

/// Outcome of one diagnostic step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub status: StepStatus,
    pub error: Option<String>,
}

impl StepResult {
    fn from_result(result: &Result<(), DispatchError>, ok: StepStatus) -> Self {
        match result {
            Ok(()) => Self {
                status: ok,
                error: None,
            },
            Err(err) => Self {
                status: StepStatus::Error,
                error: Some(err.detail().to_string()),
            },
        }
    }
}

/// `GET /api/debug`
pub async fn debug_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DebugReport>, ApiError> {
    let Some(token) = &state.config.debug.token else {
        return Err(ApiError::ApiNotFound);
    };
    if !bearer_matches(&headers, token) {
        warn!("Debug endpoint called without a valid token");
        return Err(ApiError::Unauthorized);
    }

    // diagnostic mail is not contact traffic
    let dispatcher = state.dispatcher.without_metrics();
    Ok(Json(run_diagnostics(&state.config, &dispatcher).await))
}

/// Run every diagnostic step in order.
pub async fn run_diagnostics(config: &Config, dispatcher: &Dispatcher) -> DebugReport {
    let environment = EnvironmentCheck::from_config(config);
    info!(?environment, "Debug: environment check");

    let verified = dispatcher.verify().await;
    let transporter = StepResult::from_result(&verified, StepStatus::Ok);

    let email_test = if verified.is_ok() {
        let sent = dispatcher.send(&test_message(config)).await;
        if sent.is_ok() {
            info!("Debug: test email sent");
        }
        StepResult::from_result(&sent, StepStatus::Success)
    } else {
        StepResult {
            status: StepStatus::Skipped,
            error: None,
        }
    };

    DebugReport {
        success: true,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        recommendations: recommendations(&environment, verified.as_ref().err()),
        environment,
        transporter,
        email_test,
    }
}

fn test_message(config: &Config) -> OutgoingMessage {
    let sender = config.mail.sender_address().to_string();
    let text = "This is a test email from your contact form debug endpoint.";
    OutgoingMessage {
        from: sender.clone(),
        from_name: config.mail.from_name.clone(),
        to: sender,
        reply_to: None,
        subject: "Test Email - Debug".to_string(),
        html_body: format!("<p>{text}</p>"),
        text_body: text.to_string(),
    }
}

/// Operator hints derived from the findings.
pub fn recommendations(env: &EnvironmentCheck, verify_error: Option<&DispatchError>) -> Vec<String> {
    let mut out = Vec::new();
    if !env.email_user {
        out.push("EMAIL_USER environment variable is missing".to_string());
    }
    if !env.email_pass {
        out.push("EMAIL_PASS environment variable is missing".to_string());
    }
    if env.email_pass_length < APP_PASSWORD_LEN {
        out.push(format!(
            "EMAIL_PASS seems too short for a Gmail App Password (should be {APP_PASSWORD_LEN} characters)"
        ));
    }
    if let Some(err) = verify_error {
        let detail = err.detail();
        if detail.contains("Invalid login") || matches!(err, DispatchError::Auth(_)) {
            out.push("Invalid mail credentials - check your EMAIL_USER and EMAIL_PASS".to_string());
        }
        if detail.contains("Username and Password not accepted") {
            out.push(
                "Gmail rejected credentials - ensure 2FA is enabled and you're using an App Password"
                    .to_string(),
            );
        }
    }
    if out.is_empty() {
        out.push("Configuration looks good!".to_string());
    }
    out
}

fn bearer_matches(headers: &HeaderMap, token: &Secret) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|presented| constant_time_eq(presented.trim().as_bytes(), token.expose().as_bytes()))
        .unwrap_or(false)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
