//! Message bodies for every email the server sends.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::OutgoingEmail;
use crate::config::Config;
use crate::models::{Booking, Event};
use crate::tokens::{OTP_TTL_MINUTES, RESET_TOKEN_TTL_MINUTES};

/// Escapes text interpolated into HTML bodies.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%-d %B %Y").to_string()
}

fn format_amount(amount: Decimal) -> String {
    format!("₹{}", amount.normalize())
}

/// Sender identities and link targets shared by all templates.
#[derive(Debug, Clone)]
pub struct Templates {
    brand: String,
    from_domain: String,
    site_url: String,
    admin_email: String,
}

pub enum ApprovalDecision {
    Approved { code: Option<String> },
    Rejected,
}

impl Templates {
    pub fn new(
        brand: impl Into<String>,
        from_domain: impl Into<String>,
        site_url: impl Into<String>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            from_domain: from_domain.into(),
            site_url: site_url.into(),
            admin_email: admin_email.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.email.brand_name.clone(),
            config.email.from_domain.clone(),
            config.site_url.clone(),
            config.email.admin_notify_email.clone(),
        )
    }

    fn sender(&self, label: &str, mailbox: &str) -> String {
        let name = if label.is_empty() {
            self.brand.clone()
        } else {
            format!("{} {}", self.brand, label)
        };
        format!("{} <{}@{}>", name, mailbox, self.from_domain)
    }

    pub fn booking_confirmation(&self, booking: &Booking, event: &Event, resend: bool) -> OutgoingEmail {
        let intro = if resend {
            "<p>You requested a resend of your booking confirmation.</p>"
        } else {
            ""
        };
        let html = format!(
            "<h1>Booking Confirmed!</h1>\
             <p>Hi {name},</p>{intro}\
             <p>Your booking for <strong>{title}</strong> is confirmed.</p>\
             <p><strong>Date:</strong> {date}</p>\
             <p><strong>Location:</strong> {location}</p>\
             <p><strong>Tickets:</strong> {quantity}</p>\
             <p><strong>Amount Paid:</strong> {amount}</p>\
             <br/><p>See you there!</p>",
            name = escape_html(&booking.customer_name),
            intro = intro,
            title = escape_html(&event.title),
            date = format_date(event.date),
            location = escape_html(&event.location),
            quantity = booking.quantity,
            amount = format_amount(booking.amount),
        );

        OutgoingEmail::new(
            self.sender("Tickets", "tickets"),
            booking.customer_email.clone(),
            format!("Booking Confirmed: {}", event.title),
            html,
        )
    }

    pub fn otp(&self, email: &str, otp: &str) -> OutgoingEmail {
        let html = format!(
            "<p>Your verification code is: <strong>{}</strong></p>\
             <p>This code expires in {} minutes.</p>",
            otp, OTP_TTL_MINUTES
        );
        OutgoingEmail::new(
            self.sender("Auth", "noreply"),
            email,
            "Your Verification Code",
            html,
        )
    }

    pub fn reset_link(&self, email: &str, raw_token: &str) -> String {
        format!(
            "{}/reset-password.html?token={}&email={}",
            self.site_url,
            raw_token,
            urlencoding::encode(email)
        )
    }

    pub fn password_reset(&self, email: &str, raw_token: &str) -> OutgoingEmail {
        let link = self.reset_link(email, raw_token);
        let html = format!(
            "<div style=\"font-family: sans-serif; padding: 20px; color: #333;\">\
             <h2>Reset Password</h2>\
             <p>Click the link below to reset your password. This link expires in {} minutes.</p>\
             <a href=\"{}\">Reset Password</a>\
             <p style=\"margin-top: 20px; color: #666; font-size: 12px;\">If you did not request this, please ignore this email.</p>\
             </div>",
            RESET_TOKEN_TTL_MINUTES,
            escape_html(&link)
        );
        OutgoingEmail::new(
            self.sender("", "noreply"),
            email,
            format!("Reset Your Password - {}", self.brand),
            html,
        )
    }

    pub fn approval(&self, email: &str, name: Option<&str>, decision: &ApprovalDecision) -> OutgoingEmail {
        let name = escape_html(name.filter(|n| !n.trim().is_empty()).unwrap_or("there"));
        let brand = escape_html(&self.brand);

        let (subject, html) = match decision {
            ApprovalDecision::Approved { code } => {
                let code_line = code
                    .as_deref()
                    .map(|c| format!("<p>Your referral code is <strong>{}</strong>.</p>", escape_html(c)))
                    .unwrap_or_default();
                (
                    "🎉 Your Influencer Application is Approved!".to_string(),
                    format!(
                        "<p>Hi {name},</p>\
                         <p>Congratulations! Your application to join <strong>{brand}</strong> as an influencer has been <strong>APPROVED</strong>.</p>\
                         {code_line}\
                         <p>You can now log in to your dashboard to access your referral code and promotional materials.</p>\
                         <a href=\"{site}/login.html\">Login Now</a>\
                         <p>Welcome to the team!</p>",
                        site = self.site_url,
                    ),
                )
            }
            ApprovalDecision::Rejected => (
                "Update on your Influencer Application".to_string(),
                format!(
                    "<p>Hi {name},</p>\
                     <p>Thank you for your interest in {brand}.</p>\
                     <p>After reviewing your application, we are unable to accept your request at this time.</p>\
                     <p>We appreciate your interest and wish you the best.</p>"
                ),
            ),
        };

        OutgoingEmail::new(self.sender("Admin", "admin"), email, subject, html)
    }

    pub fn contact_notification(&self, name: &str, email: &str, message: &str) -> OutgoingEmail {
        let html = format!(
            "<h3>New Contact Message</h3>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Message:</strong></p>\
             <blockquote style=\"background: #f9f9f9; padding: 10px; border-left: 4px solid #ccc;\">{}</blockquote>",
            escape_html(name),
            escape_html(email),
            escape_html(message).replace('\n', "<br>"),
        );
        OutgoingEmail::new(
            self.sender("Contact", "noreply"),
            self.admin_email.clone(),
            format!("New Inquiry from {}", name),
            html,
        )
    }
}
