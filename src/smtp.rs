// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! SMTP transport backed by lettre.
//!
//! Transport errors are folded into the four [`DispatchError`] classes:
//! timeouts, credential rejections (530/534/535 or an auth-related client
//! error), other protocol replies (unknown), and everything else, which is a
//! network, TLS or connection failure.

use crate::config::{MailConfig, SmtpTls};
use crate::dispatcher::Mailer;
use crate::error::DispatchError;
use crate::models::OutgoingMessage;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

const AUTH_REPLY_CODES: [&str; 3] = ["530", "534", "535"];

/// [`Mailer`] that relays through an SMTP server.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport. No connection is made until the first send or
    /// [`Mailer::verify`].
    pub fn new(config: &MailConfig) -> Result<Self, DispatchError> {
        let builder = match config.tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| classify(&e))?,
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| classify(&e))?
            }
            SmtpTls::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_host.as_str())
            }
        };

        let builder = builder
            .port(config.smtp_port)
            .timeout(Some(config.timeout()));

        // Credentials never go over an unencrypted connection.
        let builder = if config.tls == SmtpTls::None {
            warn!(host = %config.smtp_host, "SMTP without TLS; credentials will not be sent");
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.expose().to_string(),
            ))
        };

        debug!(
            host = %config.smtp_host,
            port = config.smtp_port,
            tls = ?config.tls,
            "SMTP transport configured"
        );

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DispatchError> {
        let email = build_message(message)?;
        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| classify(&e))
    }

    async fn verify(&self) -> Result<(), DispatchError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DispatchError::Connection(
                "SMTP server did not accept the test connection".to_string(),
            )),
            Err(e) => Err(classify(&e)),
        }
    }
}

/// Convert an [`OutgoingMessage`] into a multipart/alternative email.
pub fn build_message(message: &OutgoingMessage) -> Result<Message, DispatchError> {
    let invalid = |what: &str, e: &dyn std::fmt::Display| {
        DispatchError::Unknown(format!("invalid {what}: {e}"))
    };

    let from_address = message
        .from
        .parse()
        .map_err(|e| invalid("sender address", &e))?;
    let from = Mailbox::new(message.from_name.clone(), from_address);
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| invalid("recipient address", &e))?;

    let mut builder = Message::builder().from(from).to(to).subject(message.subject.as_str());
    if let Some(reply_to) = &message.reply_to {
        let reply_to: Mailbox = reply_to
            .parse()
            .map_err(|e| invalid("reply-to address", &e))?;
        builder = builder.reply_to(reply_to);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))
        .map_err(|e| invalid("message", &e))
}

/// Classify a lettre SMTP error.
pub fn classify(err: &SmtpError) -> DispatchError {
    let status = err.status().map(|code| code.to_string());
    classify_parts(
        err.is_timeout(),
        status.as_deref(),
        err.is_response() || err.is_transient() || err.is_permanent(),
        err.to_string(),
    )
}

/// Classification over the observable parts of a transport error.
///
/// `protocol_reply` is true when the server answered (possibly with an
/// error) as opposed to the connection failing.
pub fn classify_parts(
    timed_out: bool,
    status: Option<&str>,
    protocol_reply: bool,
    detail: String,
) -> DispatchError {
    if timed_out {
        return DispatchError::Timeout(detail);
    }
    if status.is_some_and(|code| AUTH_REPLY_CODES.contains(&code)) || mentions_auth(&detail) {
        return DispatchError::Auth(detail);
    }
    if protocol_reply {
        return DispatchError::Unknown(detail);
    }
    DispatchError::Connection(detail)
}

fn mentions_auth(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    ["authentication", "invalid login", "username and password not accepted"]
        .iter()
        .any(|needle| lower.contains(needle))
}
