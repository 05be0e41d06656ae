// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact form service.

use crate::routes::API_ENDPOINTS;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Client-caused rejection of a submission. The display text is what the
/// client receives.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name, email, subject, and message are required fields")]
    MissingFields,

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("Name must be between 2 and 100 characters")]
    InvalidName,

    #[error("Message must be between 10 and 2000 characters")]
    InvalidMessage,

    #[error("Subject must be less than 200 characters")]
    InvalidSubject,
}

/// Failure reported by the mail transport. The payload is the transport's
/// own description and is only ever logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("mail authentication rejected: {0}")]
    Auth(String),

    #[error("mail transport connection failed: {0}")]
    Connection(String),

    #[error("mail transport timed out: {0}")]
    Timeout(String),

    #[error("mail dispatch failed: {0}")]
    Unknown(String),
}

impl DispatchError {
    /// Text safe to show the submitter.
    pub fn user_message(&self) -> &'static str {
        match self {
            DispatchError::Auth(_) => "Email authentication failed. Please contact support.",
            DispatchError::Connection(_) => {
                "Connection failed. Please check your internet connection and try again."
            }
            DispatchError::Timeout(_) => "Request timed out. Please try again.",
            DispatchError::Unknown(_) => "Failed to send message. Please try again later.",
        }
    }

    /// Short classification code used in logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::Auth(_) => "EAUTH",
            DispatchError::Connection(_) => "ECONNECTION",
            DispatchError::Timeout(_) => "ETIMEDOUT",
            DispatchError::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            DispatchError::Auth(d)
            | DispatchError::Connection(d)
            | DispatchError::Timeout(d)
            | DispatchError::Unknown(d) => d,
        }
    }

    /// Operator hint logged alongside the failure.
    pub fn remedy(&self) -> &'static str {
        match self {
            DispatchError::Auth(_) => "check EMAIL_USER and EMAIL_PASS (use an app password)",
            DispatchError::Connection(_) => "check network access to the SMTP relay",
            DispatchError::Timeout(_) => "retry, or check network latency to the SMTP relay",
            DispatchError::Unknown(_) => "inspect the transport error above",
        }
    }
}

/// Fatal startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(rename = "availableEndpoints", skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<&'static [&'static str]>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            available_endpoints: None,
        }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{error}")]
    Dispatch {
        error: DispatchError,
        expose_details: bool,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("API endpoint not found")]
    ApiNotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        expose_details: bool,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ApiNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Dispatch { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(err) => ErrorResponse::new(err.to_string()),
            ApiError::BadRequest(msg) => ErrorResponse::new(msg.clone()),
            ApiError::Unauthorized => ErrorResponse::new("Unauthorized"),
            ApiError::PayloadTooLarge => ErrorResponse::new("Request body too large"),
            ApiError::ApiNotFound => ErrorResponse {
                available_endpoints: Some(API_ENDPOINTS),
                ..ErrorResponse::new("API endpoint not found")
            },
            ApiError::RouteNotFound => ErrorResponse::new("Route not found"),
            ApiError::Dispatch {
                error,
                expose_details,
            } => {
                let details = match error {
                    DispatchError::Unknown(detail) if *expose_details => Some(detail.clone()),
                    _ => None,
                };
                ErrorResponse {
                    details,
                    ..ErrorResponse::new(error.user_message())
                }
            }
            ApiError::Internal {
                message,
                expose_details,
            } => ErrorResponse {
                details: expose_details.then(|| message.clone()),
                ..ErrorResponse::new("Internal server error")
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, .. } = &self {
            error!(error = %message, "Unhandled server error");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
