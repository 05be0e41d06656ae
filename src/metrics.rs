// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for submissions, rate limiting and mail dispatch.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// How a contact request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected,
    Failed,
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

fn dispatch_label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Service metrics, held in a private registry.
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    rate_limited: IntCounter,
    dispatch_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("contact_submissions_total", "Contact submissions by outcome"),
            &["outcome"],
        )?;
        let rate_limited = IntCounter::new(
            "contact_rate_limited_total",
            "Contact requests rejected by the rate limiter",
        )?;
        let dispatch_seconds = HistogramVec::new(
            HistogramOpts::new("mail_dispatch_seconds", "Time spent handing one message to the transport")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
            &["result"],
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(rate_limited.clone()))?;
        registry.register(Box::new(dispatch_seconds.clone()))?;

        Ok(Self {
            registry,
            submissions,
            rate_limited,
            dispatch_seconds,
        })
    }

    pub fn record_submission(&self, outcome: Outcome) {
        self.submissions.with_label_values(&[outcome.label()]).inc();
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.inc();
    }

    pub fn observe_dispatch(&self, elapsed: Duration, ok: bool) {
        let histogram: Histogram = self
            .dispatch_seconds
            .with_label_values(&[dispatch_label(ok)]);
        histogram.observe(elapsed.as_secs_f64());
    }

    pub fn submissions(&self, outcome: Outcome) -> u64 {
        self.submissions.with_label_values(&[outcome.label()]).get()
    }

    pub fn rate_limited(&self) -> u64 {
        self.rate_limited.get()
    }

    /// Number of observed sends with the given result.
    pub fn dispatches(&self, ok: bool) -> u64 {
        self.dispatch_seconds
            .with_label_values(&[dispatch_label(ok)])
            .get_sample_count()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
