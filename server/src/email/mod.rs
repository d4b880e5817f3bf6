//! Transactional email.

pub mod console;
pub mod resend;
pub mod templates;

pub use console::ConsoleEmailSender;
pub use resend::{ResendEmailSender, RetryPolicy};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("transport failure after {attempts} attempt(s): {message}")]
    Transport { attempts: u32, message: String },

    #[error("email provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            html: html.into(),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends one message and returns the provider's message id.
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError>;
}
