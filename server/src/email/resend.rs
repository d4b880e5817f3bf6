use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{EmailError, EmailSender, OutgoingEmail};

const SEND_URL: &str = "https://api.resend.com/emails";

/// Fixed-pause retry for transport failures. Provider rejections are final.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pause: Duration::from_secs(1),
        }
    }
}

/// Outcome of one delivery attempt.
pub(crate) enum Attempt<T> {
    Done(T),
    Rejected(EmailError),
    Transient(String),
}

pub(crate) async fn with_retries<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, EmailError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Rejected(err) => return Err(err),
            Attempt::Transient(message) if attempt >= max_attempts => {
                return Err(EmailError::Transport {
                    attempts: attempt,
                    message,
                });
            }
            Attempt::Transient(message) => {
                tracing::warn!(
                    attempt,
                    remaining = max_attempts - attempt,
                    error = %message,
                    "Email send failed, retrying"
                );
                tokio::time::sleep(policy.pause).await;
                attempt += 1;
            }
        }
    }
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

pub struct ResendEmailSender {
    http_client: Client,
    api_key: String,
    retry: RetryPolicy,
}

impl ResendEmailSender {
    pub fn new(http_client: Client, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        }
    }

    async fn attempt(&self, email: &OutgoingEmail) -> Attempt<String> {
        let response = match self
            .http_client
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Transient(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Resend API error");
            return Attempt::Rejected(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<SendResponse>().await {
            Ok(sent) => Attempt::Done(sent.id),
            // Accepted but the body was unreadable; resending would duplicate.
            Err(e) => {
                tracing::warn!(error = %e, "Resend accepted message with unreadable response");
                Attempt::Done(String::new())
            }
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
        let id = with_retries(self.retry, || self.attempt(&email)).await?;
        tracing::info!(id = %id, to = ?email.to, subject = %email.subject, "Email sent");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            pause: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retries(instant(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Attempt::Transient("connection reset".to_string())
            } else {
                Attempt::Done("msg_1".to_string())
            }
        })
        .await;

        assert_eq!(result.unwrap(), "msg_1");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<String, _> = with_retries(instant(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Attempt::Transient("timeout".to_string())
        })
        .await;

        assert!(matches!(result, Err(EmailError::Transport { attempts: 3, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<String, _> = with_retries(instant(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Attempt::Rejected(EmailError::Rejected {
                status: 422,
                body: "invalid from".to_string(),
            })
        })
        .await;

        assert!(matches!(result, Err(EmailError::Rejected { status: 422, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
