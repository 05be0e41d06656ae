// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for flood simulations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Collects outcomes during a flood.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    outcomes: HashMap<Outcome, usize>,
    requests_per_ip: HashMap<String, usize>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    Rejected,
    RateLimited,
    Other,
}

impl Outcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Outcome::Accepted,
            400 => Outcome::Rejected,
            429 => Outcome::RateLimited,
            _ => Outcome::Other,
        }
    }
}

impl FloodMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a response status for `ip`.
    pub fn record(&mut self, status: u16, ip: &str) {
        *self.outcomes.entry(Outcome::from_status(status)).or_insert(0) += 1;
        *self.requests_per_ip.entry(ip.to_string()).or_insert(0) += 1;
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Requests that got past the limiter, whatever the handler said.
    pub fn admitted(&self) -> usize {
        self.total_requests() - self.count(Outcome::RateLimited)
    }

    pub fn unique_ips(&self) -> usize {
        self.requests_per_ip.len()
    }

    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        self.count(Outcome::RateLimited) as f64 / total as f64
    }
}

impl std::fmt::Display for FloodMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Report ===")?;
        writeln!(f, "Duration:       {} ms", self.duration().as_millis())?;
        writeln!(f, "Total Requests: {}", self.total_requests())?;
        writeln!(f, "Accepted:       {}", self.count(Outcome::Accepted))?;
        writeln!(f, "Rejected (400): {}", self.count(Outcome::Rejected))?;
        writeln!(f, "Rate Limited:   {}", self.count(Outcome::RateLimited))?;
        writeln!(f, "Other:          {}", self.count(Outcome::Other))?;
        writeln!(f, "Block Rate:     {:.1}%", self.block_rate() * 100.0)?;
        writeln!(f, "Unique IPs:     {}", self.unique_ips())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = FloodMetrics::new();
        metrics.start();
        metrics.record(200, "10.0.0.1");
        metrics.record(400, "10.0.0.1");
        metrics.record(429, "10.0.0.2");
        metrics.finish();

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.admitted(), 2);
        assert_eq!(metrics.unique_ips(), 2);
        assert!((metrics.block_rate() - 1.0 / 3.0).abs() < 0.01);
    }
}
