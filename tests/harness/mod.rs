// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the contact form API.
//!
//! Spawns the real router on a loopback port with mail doubles in place of
//! SMTP, plus payload generators and flood simulation helpers.

#![allow(dead_code)]

pub mod attacks;
pub mod generators;
pub mod mailers;
pub mod metrics;
pub mod server;
