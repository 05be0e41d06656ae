// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Mail dispatcher.
//!
//! Hands composed messages to a [`Mailer`] transport. A pair of messages is
//! sent concurrently and the pair only succeeds if both sends succeed; the
//! first failure is returned as soon as it happens. Mail that was already
//! delivered is not recalled, so a failed pair may still have delivered
//! one message. Nothing is retried.

use crate::error::DispatchError;
use crate::metrics::Metrics;
use crate::models::OutgoingMessage;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// A mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DispatchError>;

    /// Confirm the transport is reachable with the configured credentials.
    async fn verify(&self) -> Result<(), DispatchError>;
}

/// Sends messages through a shared [`Mailer`].
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    metrics: Option<Arc<Metrics>>,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer,
            metrics: None,
        }
    }

    /// Record send durations into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The same transport, with sends left out of the metrics.
    pub fn without_metrics(&self) -> Self {
        Self {
            mailer: self.mailer.clone(),
            metrics: None,
        }
    }

    /// Send a single message.
    pub async fn send(&self, message: &OutgoingMessage) -> Result<(), DispatchError> {
        let started = Instant::now();
        let result = self.mailer.send(message).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_dispatch(started.elapsed(), result.is_ok());
        }

        match &result {
            Ok(()) => debug!(to = %message.to, subject = %message.subject, "Message sent"),
            Err(err) => error!(
                to = %message.to,
                code = err.code(),
                error = %err,
                remedy = err.remedy(),
                "Message dispatch failed"
            ),
        }
        result
    }

    /// Send both messages concurrently; fails on the first error.
    pub async fn send_batch(
        &self,
        first: &OutgoingMessage,
        second: &OutgoingMessage,
    ) -> Result<(), DispatchError> {
        tokio::try_join!(self.send(first), self.send(second))?;
        Ok(())
    }

    /// Run the transport self-check.
    pub async fn verify(&self) -> Result<(), DispatchError> {
        let result = self.mailer.verify().await;
        match &result {
            Ok(()) => info!("Mail transport verified"),
            Err(err) => error!(code = err.code(), error = %err, "Mail transport verification failed"),
        }
        result
    }
}
