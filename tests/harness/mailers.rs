// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Mail transport doubles.

use async_trait::async_trait;
use contact_form_api::{models::OutgoingMessage, DispatchError, Mailer};
use std::sync::Mutex;

/// Accepts every message and keeps a copy.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMessage>>,
    verify_error: Option<DispatchError>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose self-check fails with `error` but which still sends.
    pub fn failing_verify(error: DispatchError) -> Self {
        Self {
            verify_error: Some(error),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn verify(&self) -> Result<(), DispatchError> {
        match &self.verify_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Fails every send and every self-check with the same error.
pub struct FailingMailer {
    error: DispatchError,
}

impl FailingMailer {
    pub fn new(error: DispatchError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &OutgoingMessage) -> Result<(), DispatchError> {
        Err(self.error.clone())
    }

    async fn verify(&self) -> Result<(), DispatchError> {
        Err(self.error.clone())
    }
}

/// Panics inside `send`, standing in for a handler bug.
pub struct PanickingMailer;

#[async_trait]
impl Mailer for PanickingMailer {
    async fn send(&self, _message: &OutgoingMessage) -> Result<(), DispatchError> {
        panic!("mailer blew up");
    }

    async fn verify(&self) -> Result<(), DispatchError> {
        Ok(())
    }
}
