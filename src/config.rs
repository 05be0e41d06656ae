// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form service.
//!
//! Built once at startup from the process environment (optionally seeded by
//! a `.env` file) and handed to the router, dispatcher and composer by
//! reference. Nothing reads the environment after this point.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the contact form service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:3001)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Deployment mode; development exposes error details to clients
    #[serde(default)]
    pub environment: Environment,

    /// Mail account and transport settings
    pub mail: MailConfig,

    /// Cross-origin settings
    #[serde(default)]
    pub cors: CorsConfig,

    /// Rate limiting for the contact endpoint
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Operator diagnostics
    #[serde(default)]
    pub debug: DebugConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Identity used in the auto-reply template
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Maximum accepted request body in bytes (default: 10 MiB)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Implicit TLS (SMTPS, usually port 465)
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    StartTls,
    /// Unencrypted; only for local relays and test servers
    None,
}

impl FromStr for SmtpTls {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tls" | "smtps" => Ok(SmtpTls::Tls),
            "starttls" => Ok(SmtpTls::StartTls),
            "none" | "plain" => Ok(SmtpTls::None),
            _ => Err(()),
        }
    }
}

/// Mail password; never printed or serialized.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Serialize for Secret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

/// Mail account and transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Account name; also the sender address
    pub username: String,

    /// Account credential (an app password for Gmail)
    pub password: Secret,

    /// Where notifications go; falls back to the sender address
    #[serde(default)]
    pub operator_address: Option<String>,

    /// Display name for the sender mailbox
    #[serde(default)]
    pub from_name: Option<String>,

    /// SMTP relay host (default: smtp.gmail.com)
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port (default: 465)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Connection security (default: implicit TLS)
    #[serde(default)]
    pub tls: SmtpTls,

    /// Socket timeout in seconds (default: 60)
    #[serde(default = "default_mail_timeout_secs")]
    pub timeout_secs: u64,
}

impl MailConfig {
    /// Address used as the envelope sender.
    pub fn sender_address(&self) -> &str {
        &self.username
    }

    /// Address receiving operator notifications.
    pub fn notification_address(&self) -> &str {
        self.operator_address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(&self.username)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// Rate limiting configuration for the contact endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per client IP within the window (default: 10)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Sliding window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Take the client IP from the first X-Forwarded-For hop (default: false)
    #[serde(default)]
    pub trust_proxy: bool,
}

/// Operator diagnostics configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Bearer token for `/api/debug`; the endpoint is disabled without one
    #[serde(default)]
    pub token: Option<Secret>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// Who the auto-reply is signed by, and how timestamps are displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    #[serde(default)]
    pub owner_title: Option<String>,

    /// Labelled links offered in the auto-reply, in display order
    #[serde(default)]
    pub links: Vec<ProfileLink>,

    /// Contact line printed at the bottom of the auto-reply
    #[serde(default)]
    pub footer: Option<String>,

    /// Offset from UTC used when printing receipt times (default: +05:30)
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    #[serde(default = "default_tz_label")]
    pub tz_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

// Default value functions
fn default_port() -> u16 {
    3001
}

fn default_bind_addr() -> String {
    format!("0.0.0.0:{}", default_port())
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_mail_timeout_secs() -> u64 {
    60
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_owner_name() -> String {
    "Portfolio Contact".to_string()
}

fn default_utc_offset_minutes() -> i32 {
    330
}

fn default_tz_label() -> String {
    "IST".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            trust_proxy: false,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
            owner_title: None,
            links: Vec::new(),
            footer: None,
            utc_offset_minutes: default_utc_offset_minutes(),
            tz_label: default_tz_label(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Human form of the window, e.g. "15 minutes".
    pub fn window_description(&self) -> String {
        let secs = self.window_secs;
        if secs % 3600 == 0 && secs >= 3600 {
            plural(secs / 3600, "hour")
        } else if secs % 60 == 0 && secs >= 60 {
            plural(secs / 60, "minute")
        } else {
            plural(secs, "second")
        }
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. `EMAIL_USER` and `EMAIL_PASS` are
    /// required; every other key has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = ["EMAIL_USER", "EMAIL_PASS"]
            .into_iter()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let bind_addr = match get("BIND_ADDR") {
            Some(addr) => addr,
            None => {
                let port: u16 = parse_or(&get, "PORT", default_port())?;
                format!("0.0.0.0:{port}")
            }
        };

        let mail = MailConfig {
            username: get("EMAIL_USER").unwrap_or_default().trim().to_string(),
            password: Secret::new(get("EMAIL_PASS").unwrap_or_default()),
            operator_address: get("WORK_EMAIL").map(|v| v.trim().to_string()),
            from_name: get("EMAIL_FROM_NAME"),
            smtp_host: get("SMTP_HOST").unwrap_or_else(default_smtp_host),
            smtp_port: parse_or(&get, "SMTP_PORT", default_smtp_port())?,
            tls: parse_or(&get, "SMTP_TLS", SmtpTls::default())?,
            timeout_secs: parse_or(&get, "SMTP_TIMEOUT_SECS", default_mail_timeout_secs())?,
        };

        let cors = CorsConfig {
            allowed_origins: get("FRONTEND_URL")
                .map(|v| split_list(&v))
                .unwrap_or_else(default_allowed_origins),
        };
        for origin in &cors.allowed_origins {
            if url::Url::parse(origin).is_err() {
                return Err(ConfigError::Invalid {
                    key: "FRONTEND_URL",
                    value: origin.clone(),
                });
            }
        }

        let rate_limit = RateLimitConfig {
            max_requests: parse_or(&get, "RATE_LIMIT_MAX", default_max_requests())?,
            window_secs: parse_or(&get, "RATE_LIMIT_WINDOW_SECS", default_window_secs())?,
            trust_proxy: parse_or(&get, "TRUST_PROXY", false)?,
        };

        let metrics = MetricsConfig {
            enabled: parse_or(&get, "METRICS_ENABLED", default_true())?,
            path: get("METRICS_PATH").unwrap_or_else(default_metrics_path),
        };

        let mut links = Vec::new();
        for (key, label) in [("GITHUB_URL", "GitHub"), ("LINKEDIN_URL", "LinkedIn")] {
            if let Some(link) = get(key) {
                if url::Url::parse(&link).is_err() {
                    return Err(ConfigError::Invalid { key, value: link });
                }
                links.push(ProfileLink {
                    label: label.to_string(),
                    url: link,
                });
            }
        }

        let profile = ProfileConfig {
            owner_name: get("OWNER_NAME").unwrap_or_else(default_owner_name),
            owner_title: get("OWNER_TITLE"),
            links,
            footer: get("CONTACT_FOOTER"),
            utc_offset_minutes: parse_or(
                &get,
                "DISPLAY_UTC_OFFSET_MINUTES",
                default_utc_offset_minutes(),
            )?,
            tz_label: get("DISPLAY_TZ_LABEL").unwrap_or_else(default_tz_label),
        };

        Ok(Self {
            bind_addr,
            environment: parse_or(&get, "APP_ENV", Environment::default())?,
            mail,
            cors,
            rate_limit,
            debug: DebugConfig {
                token: get("DEBUG_TOKEN").map(Secret::new),
            },
            metrics,
            profile,
            body_limit_bytes: parse_or(&get, "BODY_LIMIT_BYTES", default_body_limit())?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
