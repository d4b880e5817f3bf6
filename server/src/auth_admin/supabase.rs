use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{AuthAdmin, AuthAdminError};
use crate::config::SupabaseConfig;

const LIST_PAGE_SIZE: u32 = 1000;

/// Admin client for a GoTrue-compatible auth server, authenticated with the
/// service-role key. Never used outside server handlers.
pub struct SupabaseAuthAdmin {
    http_client: Client,
    base_url: String,
    service_role_key: String,
}

#[derive(Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

#[derive(Deserialize)]
struct UserList {
    users: Vec<AuthUser>,
}

#[derive(Deserialize)]
struct GeneratedLink {
    action_link: String,
}

impl SupabaseAuthAdmin {
    pub fn new(http_client: Client, config: &SupabaseConfig) -> Self {
        Self {
            http_client,
            base_url: format!("{}/auth/v1", config.url),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, AuthAdminError> {
        builder
            .send()
            .await
            .map_err(|e| AuthAdminError::Transport(e.to_string()))
    }

    async fn rejected(response: Response) -> AuthAdminError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status, body = %body, "Auth provider request failed");
        AuthAdminError::Rejected { status, body }
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, AuthAdminError> {
        response
            .json()
            .await
            .map_err(|e| AuthAdminError::Decode(e.to_string()))
    }
}

fn is_duplicate_email(status: StatusCode, body: &str) -> bool {
    matches!(status, StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST)
        && (body.contains("email_exists")
            || body.contains("already been registered")
            || body.contains("already registered"))
}

#[async_trait]
impl AuthAdmin for SupabaseAuthAdmin {
    async fn create_user(&self, email: &str, password: &str) -> Result<Uuid, AuthAdminError> {
        let request = self
            .admin(self.http_client.post(format!("{}/admin/users", self.base_url)))
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }));
        let response = Self::send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_duplicate_email(status, &body) {
                return Err(AuthAdminError::AlreadyExists);
            }
            tracing::error!(status = status.as_u16(), body = %body, "Create user failed");
            return Err(AuthAdminError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let user: AuthUser = Self::decode(response).await?;
        Ok(user.id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>, AuthAdminError> {
        let wanted = email.to_lowercase();
        let mut page = 1u32;

        loop {
            let request = self
                .admin(self.http_client.get(format!("{}/admin/users", self.base_url)))
                .query(&[("page", page), ("per_page", LIST_PAGE_SIZE)]);
            let response = Self::send(request).await?;
            if !response.status().is_success() {
                return Err(Self::rejected(response).await);
            }

            let list: UserList = Self::decode(response).await?;
            if let Some(user) = list
                .users
                .iter()
                .find(|u| u.email.as_deref().map(str::to_lowercase).as_deref() == Some(wanted.as_str()))
            {
                return Ok(Some(user.id));
            }
            if list.users.len() < LIST_PAGE_SIZE as usize {
                return Ok(None);
            }
            page += 1;
        }
    }

    async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), AuthAdminError> {
        let request = self
            .admin(
                self.http_client
                    .put(format!("{}/admin/users/{}", self.base_url, user_id)),
            )
            .json(&json!({ "password": password, "email_confirm": true }));
        let response = Self::send(request).await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AuthAdminError::NotFound),
            _ => Err(Self::rejected(response).await),
        }
    }

    async fn generate_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<String, AuthAdminError> {
        let request = self
            .admin(
                self.http_client
                    .post(format!("{}/admin/generate_link", self.base_url)),
            )
            .json(&json!({
                "type": "magiclink",
                "email": email,
                "redirect_to": redirect_to,
            }));
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let link: GeneratedLink = Self::decode(response).await?;
        Ok(link.action_link)
    }

    async fn user_from_access_token(&self, token: &str) -> Result<Uuid, AuthAdminError> {
        let request = self
            .http_client
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.service_role_key)
            .bearer_auth(token);
        let response = Self::send(request).await?;

        match response.status() {
            s if s.is_success() => {
                let user: AuthUser = Self::decode(response).await?;
                Ok(user.id)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthAdminError::InvalidToken),
            _ => Err(Self::rejected(response).await),
        }
    }
}
