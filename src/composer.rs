// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Message composer.
//!
//! Pure templating over a [`SanitizedSubmission`]: builds the operator
//! notification and the submitter auto-reply, each with an HTML body and a
//! plain-text body carrying the same field values. No I/O happens here; the
//! receipt time is passed in.

use crate::config::{MailConfig, ProfileConfig};
use crate::models::{OutgoingMessage, SanitizedSubmission};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt::Write as _;

const PRIMARY: &str = "#667eea";
const ACCENT: &str = "#ff9500";
const SUCCESS: &str = "#4CAF50";

/// Everything besides the submission that a template needs.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub mail: &'a MailConfig,
    pub profile: &'a ProfileConfig,
    pub received_at: DateTime<Utc>,
}

/// Build `(notification, auto_reply)` for one submission.
pub fn compose(
    submission: &SanitizedSubmission,
    ctx: &ComposeContext<'_>,
) -> (OutgoingMessage, OutgoingMessage) {
    (notification(submission, ctx), auto_reply(submission, ctx))
}

/// Receipt time rendered in the profile's display offset.
pub fn format_received_at(received_at: DateTime<Utc>, profile: &ProfileConfig) -> String {
    let offset = FixedOffset::east_opt(profile.utc_offset_minutes * 60)
        .unwrap_or_else(|| Utc.fix());
    format!(
        "{} {}",
        received_at
            .with_timezone(&offset)
            .format("%A, %-d %B %Y, %I:%M %p"),
        profile.tz_label
    )
}

/// Operator notification carrying every submitted field.
pub fn notification(s: &SanitizedSubmission, ctx: &ComposeContext<'_>) -> OutgoingMessage {
    let received = format_received_at(ctx.received_at, ctx.profile);

    OutgoingMessage {
        from: ctx.mail.sender_address().to_string(),
        from_name: ctx.mail.from_name.clone(),
        to: ctx.mail.notification_address().to_string(),
        reply_to: Some(s.email.clone()),
        subject: format!("New Project Inquiry: {}", s.subject),
        html_body: notification_html(s, &received),
        text_body: notification_text(s, &received),
    }
}

/// Acknowledgement sent back to the submitter.
pub fn auto_reply(s: &SanitizedSubmission, ctx: &ComposeContext<'_>) -> OutgoingMessage {
    OutgoingMessage {
        from: ctx.mail.sender_address().to_string(),
        from_name: ctx.mail.from_name.clone(),
        to: s.email.clone(),
        reply_to: None,
        subject: format!("Thanks for reaching out! Re: {}", s.subject),
        html_body: auto_reply_html(s, ctx.profile),
        text_body: auto_reply_text(s, ctx.profile),
    }
}

fn notification_text(s: &SanitizedSubmission, received: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NEW PROJECT INQUIRY - {}", s.subject);
    out.push('\n');
    out.push_str("CLIENT INFORMATION:\n");
    let _ = writeln!(out, "Name: {}", s.name);
    let _ = writeln!(out, "Email: {}", s.email);
    if let Some(phone) = s.phone() {
        let _ = writeln!(out, "Phone: {phone}");
    }
    if let Some(company) = s.company() {
        let _ = writeln!(out, "Company: {company}");
    }
    let _ = writeln!(out, "Subject: {}", s.subject);

    if s.budget().is_some() || s.timeline().is_some() {
        out.push_str("\nPROJECT DETAILS:\n");
        if let Some(budget) = s.budget() {
            let _ = writeln!(out, "Budget: {budget}");
        }
        if let Some(timeline) = s.timeline() {
            let _ = writeln!(out, "Timeline: {timeline}");
        }
    }

    out.push_str("\nMESSAGE:\n");
    let _ = writeln!(out, "{}", s.message);
    out.push_str("\n---\n");
    let _ = writeln!(out, "Reply to: {}", s.email);
    if let Some(phone) = s.phone() {
        let _ = writeln!(out, "Call: {phone}");
    }
    let _ = writeln!(out, "Received: {received}");
    out
}

fn field_card(label: &str, value: &str, color: &str) -> String {
    format!(
        r#"<div style="background: white; padding: 15px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.05); margin-bottom: 15px;">
  <strong style="color: {color}; font-size: 12px; text-transform: uppercase; letter-spacing: 1px;">{label}</strong>
  <p style="margin: 5px 0 0 0; color: #333; font-size: 16px; font-weight: 600;">{value}</p>
</div>
"#
    )
}

fn section(title: &str, border: &str, background: &str, inner: &str) -> String {
    format!(
        r#"<div style="background: {background}; padding: 25px; border-radius: 12px; margin-bottom: 30px; border-left: 5px solid {border};">
  <h3 style="color: #333; margin: 0 0 20px 0; font-size: 20px;">{title}</h3>
{inner}</div>
"#
    )
}

fn frame(heading: &str, inner: &str) -> String {
    format!(
        r#"<div style="font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; max-width: 650px; margin: 0 auto; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 20px; border-radius: 20px;">
<div style="background: white; padding: 40px; border-radius: 15px; box-shadow: 0 20px 60px rgba(0,0,0,0.1);">
<div style="text-align: center; margin-bottom: 40px;">
  <h1 style="color: #333; margin: 0; font-size: 30px; font-weight: 700;">{heading}</h1>
  <div style="width: 80px; height: 4px; background: linear-gradient(45deg, #667eea, #764ba2); margin: 20px auto; border-radius: 2px;"></div>
</div>
{inner}</div>
</div>
"#
    )
}

fn notification_html(s: &SanitizedSubmission, received: &str) -> String {
    let mut client = String::new();
    client.push_str(&field_card("Name", &s.name, PRIMARY));
    client.push_str(&field_card(
        "Email",
        &format!(
            r#"<a href="mailto:{email}" style="color: {PRIMARY}; text-decoration: none;">{email}</a>"#,
            email = s.email
        ),
        PRIMARY,
    ));
    if let Some(phone) = s.phone() {
        client.push_str(&field_card("Phone", phone, PRIMARY));
    }
    if let Some(company) = s.company() {
        client.push_str(&field_card("Company", company, PRIMARY));
    }
    client.push_str(&field_card("Subject", &s.subject, PRIMARY));

    let mut inner = section("Client Information", PRIMARY, "#f8f9ff", &client);

    if s.budget().is_some() || s.timeline().is_some() {
        let mut details = String::new();
        if let Some(budget) = s.budget() {
            details.push_str(&field_card("Budget", budget, ACCENT));
        }
        if let Some(timeline) = s.timeline() {
            details.push_str(&field_card("Timeline", timeline, ACCENT));
        }
        inner.push_str(&section("Project Details", ACCENT, "#fff8f0", &details));
    }

    let message = format!(
        r#"<div style="background: white; padding: 20px; border-radius: 10px;">
  <p style="color: #555; line-height: 1.8; margin: 0; font-size: 16px; white-space: pre-wrap;">{}</p>
</div>
"#,
        s.message
    );
    inner.push_str(&section("Message", SUCCESS, "#f0f8ff", &message));

    let _ = write!(
        inner,
        r#"<div style="text-align: center; margin-top: 40px; padding-top: 30px; border-top: 2px solid #f0f0f0;">
  <p style="color: {PRIMARY}; font-size: 16px; font-weight: 600;">Reply to: {}</p>
"#,
        s.email
    );
    if let Some(phone) = s.phone() {
        let _ = writeln!(
            inner,
            r#"  <p style="color: {SUCCESS}; font-size: 16px; font-weight: 600;">Call: {phone}</p>"#
        );
    }
    inner.push_str("</div>\n");

    let _ = write!(
        inner,
        r#"<div style="text-align: center; margin-top: 40px; padding-top: 30px; border-top: 1px solid #e1e5e9;">
  <p style="color: #888; font-size: 14px; margin: 0;">Portfolio Contact Form &bull; Received: {received}</p>
</div>
"#
    );

    frame("NEW PROJECT INQUIRY", &inner)
}

const NEXT_STEPS: [&str; 3] = [
    "I'll review your project details carefully",
    "You'll hear back from me within 24 hours",
    "We can schedule a call to discuss your vision in detail",
];

fn signature_lines(profile: &ProfileConfig) -> Vec<&str> {
    let mut lines = vec![profile.owner_name.as_str()];
    if let Some(title) = profile.owner_title.as_deref() {
        lines.push(title);
    }
    lines
}

fn auto_reply_text(s: &SanitizedSubmission, profile: &ProfileConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hi {},", s.name);
    out.push('\n');
    let _ = writeln!(
        out,
        "Thanks for your interest in working together! I've received your message about \"{}\" and I'm excited to learn more about your project.",
        s.subject
    );
    out.push_str("\nWhat happens next?\n");
    for step in NEXT_STEPS {
        let _ = writeln!(out, "- {step}");
    }
    let _ = writeln!(out, "\nYour message: \"{}\"", s.message);

    if !profile.links.is_empty() {
        out.push_str("\nIn the meantime, feel free to check out my work:\n");
        for link in &profile.links {
            let _ = writeln!(out, "- {}: {}", link.label, link.url);
        }
    }

    out.push_str("\nLooking forward to building something amazing together!\n\nBest regards,\n");
    for line in signature_lines(profile) {
        let _ = writeln!(out, "{line}");
    }
    if let Some(footer) = profile.footer.as_deref() {
        let _ = writeln!(out, "\n{footer}");
    }
    out
}

fn auto_reply_html(s: &SanitizedSubmission, profile: &ProfileConfig) -> String {
    let mut inner = String::from(
        r#"<div style="color: #555; line-height: 1.8; font-size: 16px;">
"#,
    );
    let _ = write!(
        inner,
        r#"<p style="font-size: 18px;">Hi <strong style="color: #333; font-size: 20px;">{name}</strong>,</p>
<p>Thanks for your interest in working together! I've received your message about "<strong style="color: {PRIMARY};">{subject}</strong>" and I'm excited to learn more about your project.</p>
"#,
        name = s.name,
        subject = s.subject
    );

    let mut steps = String::from(r#"<ul style="padding-left: 20px;">"#);
    for step in NEXT_STEPS {
        let _ = write!(steps, r#"<li style="margin: 12px 0;">{step}</li>"#);
    }
    steps.push_str("</ul>\n");
    inner.push_str(&section("What happens next?", PRIMARY, "#f8f9ff", &steps));

    let _ = write!(
        inner,
        r#"<div style="background: #fff8f0; padding: 20px; border-radius: 10px; margin: 25px 0; border-left: 4px solid {ACCENT};">
  <p style="margin: 0; color: #555; font-style: italic;"><strong style="color: #333;">Your message:</strong></p>
  <p style="margin: 15px 0 0 0; color: #666; background: white; padding: 15px; border-radius: 8px; white-space: pre-wrap;">"{}"</p>
</div>
"#,
        s.message
    );

    if !profile.links.is_empty() {
        inner.push_str("<p>In the meantime, feel free to check out my work:</p>\n<p>\n");
        for link in &profile.links {
            let _ = writeln!(
                inner,
                r#"  <a href="{url}" style="display: inline-block; background: #24292e; color: white; padding: 12px 18px; margin: 4px; text-decoration: none; border-radius: 10px; font-weight: 600;">{label}</a>"#,
                url = link.url,
                label = link.label
            );
        }
        inner.push_str("</p>\n");
    }

    inner.push_str(
        r#"<p style="font-size: 18px; font-weight: 600; color: #333;">Looking forward to building something amazing together!</p>
<div style="margin-top: 40px; padding-top: 30px; border-top: 2px solid #f0f0f0;">
<p style="margin: 0; font-size: 18px; font-weight: 600;">Best regards,<br>
"#,
    );
    let signature = signature_lines(profile);
    let _ = writeln!(
        inner,
        r#"<span style="color: {PRIMARY}; font-size: 24px; font-weight: 700;">{}</span><br>"#,
        signature[0]
    );
    for line in &signature[1..] {
        let _ = writeln!(inner, "{line}<br>");
    }
    inner.push_str("</p>\n</div>\n</div>\n");

    if let Some(footer) = profile.footer.as_deref() {
        let _ = write!(
            inner,
            r#"<div style="text-align: center; margin-top: 40px; padding-top: 30px; border-top: 1px solid #e1e5e9;">
  <p style="color: {PRIMARY}; font-size: 14px; margin: 0; font-weight: 600;">{footer}</p>
</div>
"#
        );
    }

    frame("Thanks for reaching out!", &inner)
}
