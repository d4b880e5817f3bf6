//! Best-effort notifications.
//!
//! Notification failures are logged and swallowed; they never change the
//! result of the request that triggered them.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::email::{EmailError, EmailSender, OutgoingEmail};

/// Runs `task` on its own Tokio task. Failures are logged under `label`.
pub fn spawn_best_effort<F, T, E>(label: &'static str, task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::warn!(notification = label, error = %e, "Best-effort notification failed");
        }
    })
}

/// Awaited variant: sends now, logs a failure, and reports whether the
/// message went out.
pub async fn send_best_effort(
    mailer: &dyn EmailSender,
    label: &'static str,
    email: OutgoingEmail,
) -> bool {
    match mailer.send(email).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(notification = label, error = %e, "Best-effort notification failed");
            false
        }
    }
}

/// Spawns a single email send.
pub fn spawn_email(
    mailer: Arc<dyn EmailSender>,
    label: &'static str,
    email: OutgoingEmail,
) -> JoinHandle<()> {
    spawn_best_effort::<_, String, EmailError>(label, async move { mailer.send(email).await })
}
