// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Input sanitizer for user-supplied text that ends up in HTML mail.
//!
//! Removes, in order:
//! - `<script>...</script>` blocks
//! - bare `<` and `>` characters
//! - `javascript:` prefixes
//! - inline event-handler patterns (`onclick=`, `onload =`, ...)
//!
//! Removal repeats until nothing changes, so fragments that only form a
//! pattern after an inner removal are caught too. The result is trimmed and
//! capped at [`MAX_FIELD_CHARS`] characters.
//!
//! Raw input is clipped to [`MAX_RAW_CHARS`] before removal starts. Each pass
//! can peel a single layer of nesting, so the clip bounds the total work.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Per-field character cap.
pub const MAX_FIELD_CHARS: usize = 2000;

/// Characters of raw input considered before removal.
pub const MAX_RAW_CHARS: usize = 8 * MAX_FIELD_CHARS;

struct Patterns {
    script_block: Regex,
    angle_brackets: Regex,
    javascript_uri: Regex,
    event_handler: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        script_block: Regex::new(r"(?is)<script\b.*?</script>").expect("static pattern"),
        angle_brackets: Regex::new(r"[<>]").expect("static pattern"),
        javascript_uri: Regex::new(r"(?i)javascript:").expect("static pattern"),
        event_handler: Regex::new(r"(?i)on[a-z0-9_]+\s*=").expect("static pattern"),
    })
}

/// Sanitize one string field.
pub fn sanitize(raw: &str) -> String {
    let p = patterns();
    let mut current = truncate_chars(raw, MAX_RAW_CHARS).to_string();

    loop {
        let next = p.script_block.replace_all(&current, "");
        let next = p.angle_brackets.replace_all(&next, "");
        let next = p.javascript_uri.replace_all(&next, "");
        let next = p.event_handler.replace_all(&next, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }

    let trimmed = current.trim();
    truncate_chars(trimmed, MAX_FIELD_CHARS).trim_end().to_string()
}

/// Sanitize a raw JSON field; anything but a string yields `""`.
pub fn sanitize_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => sanitize(s),
        _ => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
