//! Console-based email sender for development

use async_trait::async_trait;
use uuid::Uuid;

use super::{EmailError, EmailSender, OutgoingEmail};

/// Logs messages instead of delivering them. Selected when no provider key is
/// configured.
#[derive(Debug, Default)]
pub struct ConsoleEmailSender;

impl ConsoleEmailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailSender for ConsoleEmailSender {
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
        let id = format!("console_{}", Uuid::new_v4().simple());
        tracing::info!(
            id = %id,
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            "Email not delivered (console sender)"
        );
        tracing::debug!(html = %email.html, "Email body");
        Ok(id)
    }
}
