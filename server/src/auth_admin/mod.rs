//! Seam to the hosted authentication system (accounts, passwords, login links).

mod supabase;

pub use supabase::SupabaseAuthAdmin;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthAdminError {
    #[error("a user with this email already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("access token rejected")]
    InvalidToken,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("auth provider rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected auth provider response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait AuthAdmin: Send + Sync {
    /// Creates a confirmed account.
    async fn create_user(&self, email: &str, password: &str) -> Result<Uuid, AuthAdminError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>, AuthAdminError>;

    /// Sets a new password and marks the email confirmed.
    async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), AuthAdminError>;

    /// One-time login link that establishes a session when followed.
    async fn generate_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<String, AuthAdminError>;

    /// Resolves a browser session's access token to its user id.
    async fn user_from_access_token(&self, token: &str) -> Result<Uuid, AuthAdminError>;
}

/// Creates the account, or when the email is already registered, resets that
/// account's password. Returns the user id either way.
pub async fn create_or_update_user(
    auth: &dyn AuthAdmin,
    email: &str,
    password: &str,
) -> Result<Uuid, AuthAdminError> {
    match auth.create_user(email, password).await {
        Ok(id) => {
            tracing::info!(user_id = %id, "Created auth user");
            Ok(id)
        }
        Err(AuthAdminError::AlreadyExists) => {
            let id = auth
                .find_user_by_email(email)
                .await?
                .ok_or(AuthAdminError::NotFound)?;
            auth.update_password(id, password).await?;
            tracing::info!(user_id = %id, "Updated password for existing auth user");
            Ok(id)
        }
        Err(e) => Err(e),
    }
}
