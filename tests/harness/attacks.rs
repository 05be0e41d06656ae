// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Flood patterns against the contact endpoint.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique client IPs to spread them over
    pub unique_ips: usize,
    /// Whether each body passes validation
    pub valid_payload: bool,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 30,
            unique_ips: 1,
            valid_payload: true,
        }
    }
}

/// Predefined flood patterns.
impl FloodConfig {
    /// Single IP flood - one client hammering the form.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 30,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Distributed flood - many clients, a few requests each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 60,
            unique_ips: 20,
            ..Default::default()
        }
    }

    /// Junk flood - invalid bodies still spend the client's budget.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 25,
            unique_ips: 1,
            valid_payload: false,
        }
    }

    /// Requests that get past the limiter when each IP may send `max`.
    pub fn expected_admitted(&self, max: usize) -> usize {
        let per_ip = self.total_requests / self.unique_ips;
        let extra = self.total_requests % self.unique_ips;
        (0..self.unique_ips)
            .map(|i| (per_ip + usize::from(i < extra)).min(max))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_admitted() {
        assert_eq!(FloodConfig::single_ip_flood().expected_admitted(10), 10);
        assert_eq!(FloodConfig::distributed_flood().expected_admitted(10), 60);
        assert_eq!(
            FloodConfig {
                total_requests: 25,
                unique_ips: 2,
                valid_payload: true
            }
            .expected_admitted(10),
            20
        );
    }
}
