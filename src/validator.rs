// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission validator.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. name, email, subject and message present
//! 2. email matches the address pattern, is at most 254 characters and
//!    parses as a mailbox address once sanitized
//! 3. sanitized name is 2..=100 characters
//! 4. sanitized message is 10..=2000 characters
//! 5. sanitized subject is at most 200 characters

use crate::error::ValidationError;
use crate::models::{is_present, ContactSubmission, SanitizedSubmission};
use crate::sanitizer::{sanitize, sanitize_value};
use lettre::Address;
use regex::Regex;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::sync::OnceLock;
use tracing::debug;

pub const MAX_EMAIL_LEN: usize = 254;
pub const NAME_LEN: RangeInclusive<usize> = 2..=100;
pub const MESSAGE_LEN: RangeInclusive<usize> = 10..=2000;
pub const MAX_SUBJECT_LEN: usize = 200;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("static pattern")
    })
}

/// Check an address against the accepted pattern and length.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && email_pattern().is_match(email)
}

/// Validate and sanitize a raw submission.
pub fn validate(submission: &ContactSubmission) -> Result<SanitizedSubmission, ValidationError> {
    let required = [
        &submission.name,
        &submission.email,
        &submission.subject,
        &submission.message,
    ];
    if !required.iter().all(|field| is_present(field.as_ref())) {
        debug!("Missing required field");
        return Err(ValidationError::MissingFields);
    }

    let email = match &submission.email {
        Some(Value::String(s)) if is_valid_email(s) => sanitize(s).to_lowercase(),
        _ => {
            debug!("Email failed pattern check");
            return Err(ValidationError::InvalidEmail);
        }
    };
    if let Err(e) = email.parse::<Address>() {
        debug!(error = %e, "Email is not a deliverable address");
        return Err(ValidationError::InvalidEmail);
    }

    let sanitized = SanitizedSubmission {
        name: sanitize_value(submission.name.as_ref()),
        email,
        subject: sanitize_value(submission.subject.as_ref()),
        message: sanitize_value(submission.message.as_ref()),
        phone: sanitize_optional(submission.phone.as_ref()),
        company: sanitize_optional(submission.company.as_ref()),
        budget: sanitize_optional(submission.budget.as_ref()),
        timeline: sanitize_optional(submission.timeline.as_ref()),
    };

    let name_len = sanitized.name.chars().count();
    if !NAME_LEN.contains(&name_len) {
        debug!(name_len, "Name length out of range");
        return Err(ValidationError::InvalidName);
    }

    let message_len = sanitized.message.chars().count();
    if !MESSAGE_LEN.contains(&message_len) {
        debug!(message_len, "Message length out of range");
        return Err(ValidationError::InvalidMessage);
    }

    let subject_len = sanitized.subject.chars().count();
    if subject_len > MAX_SUBJECT_LEN {
        debug!(subject_len, "Subject too long");
        return Err(ValidationError::InvalidSubject);
    }

    Ok(sanitized)
}

fn sanitize_optional(value: Option<&Value>) -> String {
    if is_present(value) {
        sanitize_value(value)
    } else {
        String::new()
    }
}
