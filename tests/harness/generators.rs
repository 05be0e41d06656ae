// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// The smallest submission that passes every rule.
pub fn minimal_submission() -> Value {
    json!({
        "name": "Jo",
        "email": "jo@example.com",
        "subject": "Hi",
        "message": "1234567890"
    })
}

/// A submission with every optional field filled in.
pub fn full_submission() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "Ada@Example.com",
        "subject": "Analytical engine website",
        "message": "I would like a site for my new engine. Budget is flexible.",
        "phone": "+44 20 7946 0000",
        "company": "Babbage & Co",
        "budget": "$5k-$10k",
        "timeline": "3 months"
    })
}

/// Copies of `base` with one required field removed or emptied each.
pub fn missing_field_variants(base: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    for field in ["name", "email", "subject", "message"] {
        for blank in [None, Some(json!("")), Some(json!(null)), Some(json!(false))] {
            let mut variant = base.clone();
            let obj = variant.as_object_mut().unwrap();
            match &blank {
                None => {
                    obj.remove(field);
                }
                Some(v) => {
                    obj.insert(field.to_string(), v.clone());
                }
            }
            out.push((format!("{field}={blank:?}"), variant));
        }
    }
    out
}

/// Addresses the validator must reject.
pub fn invalid_emails() -> Vec<String> {
    vec![
        "plainaddress".to_string(),
        "@example.com".to_string(),
        "jo@".to_string(),
        "jo@@example.com".to_string(),
        "jo smith@example.com".to_string(),
        "jo@-example.com".to_string(),
        "jo@example..com".to_string(),
        "<script>@example.com".to_string(),
        format!("{}@example.com", "a".repeat(250)),
        "jo..smith@example.com".to_string(),
        ".jo@example.com".to_string(),
    ]
}

/// Markup and script injection payloads.
pub fn injection_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert('xss')</script>Hello there friend",
        "<SCRIPT SRC=//evil.example/x.js></SCRIPT>Hello there friend",
        "<scr<script></script>ipt>alert(1)</script>",
        "<img src=x onerror=alert(1)>",
        "<a href=\"javascript:alert(1)\">click me please</a>",
        "JaVaScRiPt:alert(document.cookie)",
        "<body onload = steal()>",
        "<<script>>nested<</script>>",
        "javajavascript:script:alert(1)",
        "<svg/onload=alert(1)>",
        "normal text with < and > signs",
        "   padded   ",
    ]
}
