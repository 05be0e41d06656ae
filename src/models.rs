// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data carried through one contact request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw contact form body as posted by the client.
///
/// Fields stay untyped JSON so presence and "not a string" can be told
/// apart: a present non-string value passes the presence check and then
/// sanitizes to an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub subject: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub budget: Option<Value>,
    #[serde(default)]
    pub timeline: Option<Value>,
}

impl ContactSubmission {
    /// Convenience constructor for the four required fields.
    pub fn new(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            name: Some(Value::from(name)),
            email: Some(Value::from(email)),
            subject: Some(Value::from(subject)),
            message: Some(Value::from(message)),
            ..Default::default()
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(Value::from(phone));
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(Value::from(company));
        self
    }

    pub fn with_budget(mut self, budget: &str) -> Self {
        self.budget = Some(Value::from(budget));
        self
    }

    pub fn with_timeline(mut self, timeline: &str) -> Self {
        self.timeline = Some(Value::from(timeline));
        self
    }
}

/// Whether a raw field counts as supplied: absent, `null`, `""`, `false`
/// and `0` do not.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Submission after sanitization and validation. Optional fields are empty
/// strings when not supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: String,
    pub company: String,
    pub budget: String,
    pub timeline: String,
}

impl SanitizedSubmission {
    pub fn phone(&self) -> Option<&str> {
        non_empty(&self.phone)
    }

    pub fn company(&self) -> Option<&str> {
        non_empty(&self.company)
    }

    pub fn budget(&self) -> Option<&str> {
        non_empty(&self.budget)
    }

    pub fn timeline(&self) -> Option<&str> {
        non_empty(&self.timeline)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A fully composed email, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub from: String,
    /// Display name for the sender mailbox
    pub from_name: Option<String>,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}
