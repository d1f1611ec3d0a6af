//! GoTrue authentication and the in-memory session

use super::SupabaseClient;
use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, Duration, Utc};
use cookcraft_shared::errors::AuthError;
use cookcraft_shared::validation::{validate_name, Credentials};
use reqwest::Response;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Signed-in user as reported by the auth server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Active session; tokens never leave this type in plain form
pub struct Session {
    access_token: Secret<String>,
    refresh_token: Secret<String>,
    expires_at: DateTime<Utc>,
    user: AuthUser,
}

impl Session {
    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Expired, or expiring within the next 30 seconds
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(30)
    }

    pub(super) fn bearer(&self) -> String {
        self.access_token.expose_secret().clone()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Result of a sign-up request
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    /// False when the project requires e-mail confirmation first
    pub signed_in: bool,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(self.expires_in));

        Session {
            access_token: Secret::new(self.access_token),
            refresh_token: Secret::new(self.refresh_token),
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Deserialize, Default)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Map an auth failure response onto [`AuthError`]
async fn auth_failure(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: AuthErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .error_description
        .or(body.msg)
        .or(body.message)
        .or(body.error)
        .unwrap_or(text);

    warn!(status = %status, message = %message, "Auth request rejected");
    ClientError::Auth(AuthError::from_message(&message))
}

/// Connection-level failures surface as [`AuthError::Network`]
fn transport_failure(err: reqwest::Error) -> ClientError {
    if err.is_connect() || err.is_timeout() {
        ClientError::Auth(AuthError::Network)
    } else {
        ClientError::Http(err)
    }
}

impl SupabaseClient {
    async fn store_session(&self, session: Session) -> AuthUser {
        let user = session.user.clone();
        *self.session.write().await = Some(session);
        user
    }

    async fn post_auth(&self, path: &str, body: serde_json::Value) -> ClientResult<Response> {
        let url = self.endpoint(&format!("auth/v1/{}", path));
        let response = self
            .http
            .post(&url)
            .header("apikey", &*self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(auth_failure(response).await)
        }
    }

    /// Sign in with e-mail and password
    pub async fn sign_in(&self, credentials: &Credentials) -> ClientResult<AuthUser> {
        credentials.check()?;

        let response = self
            .post_auth(
                "token?grant_type=password",
                json!({ "email": credentials.email, "password": credentials.password }),
            )
            .await?;
        let tokens: TokenResponse = serde_json::from_slice(&response.bytes().await?)?;

        let user = self.store_session(tokens.into_session()).await;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Create an account; the session starts immediately unless the project
    /// requires e-mail confirmation
    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        first_name: &str,
        last_name: &str,
    ) -> ClientResult<SignUpOutcome> {
        credentials.check()?;
        validate_name(first_name).map_err(ClientError::Validation)?;
        validate_name(last_name).map_err(ClientError::Validation)?;

        let response = self
            .post_auth(
                "signup",
                json!({
                    "email": credentials.email,
                    "password": credentials.password,
                    "data": { "first_name": first_name.trim(), "last_name": last_name.trim() }
                }),
            )
            .await?;
        let body: serde_json::Value = serde_json::from_slice(&response.bytes().await?)?;

        if body.get("access_token").is_some() {
            let tokens: TokenResponse = serde_json::from_value(body)?;
            let user = self.store_session(tokens.into_session()).await;
            info!(user_id = %user.id, "Signed up and signed in");
            return Ok(SignUpOutcome { user, signed_in: true });
        }

        let user_value = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user_value)
            .map_err(|_| ClientError::Auth(AuthError::SignUpFailed))?;
        info!(user_id = %user.id, "Signed up, awaiting e-mail confirmation");
        Ok(SignUpOutcome { user, signed_in: false })
    }

    /// Exchange the refresh token for a new session.
    ///
    /// A rejected refresh clears the local session.
    pub async fn refresh_session(&self) -> ClientResult<AuthUser> {
        let refresh_token = match self.session.read().await.as_ref() {
            Some(session) => session.refresh_token.expose_secret().clone(),
            None => return Err(ClientError::NotAuthenticated),
        };

        let result = self
            .post_auth(
                "token?grant_type=refresh_token",
                json!({ "refresh_token": refresh_token }),
            )
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Session refresh failed");
                *self.session.write().await = None;
                return Err(err);
            }
        };

        let tokens: TokenResponse = serde_json::from_slice(&response.bytes().await?)?;
        let user = self.store_session(tokens.into_session()).await;
        debug!(user_id = %user.id, "Session refreshed");
        Ok(user)
    }

    /// End the session; the local session is cleared even if the server call fails
    pub async fn sign_out(&self) {
        if self.session.read().await.is_none() {
            return;
        }

        let url = self.endpoint("auth/v1/logout");
        let request = self.authorize(self.http.post(&url)).await;
        match request.send().await {
            Ok(response) if response.status().is_success() => info!("Signed out"),
            Ok(response) => warn!(status = %response.status(), "Sign-out rejected by server"),
            Err(err) => warn!(error = %err, "Sign-out request failed"),
        }

        *self.session.write().await = None;
    }

    /// Await `work`, then end the session whether it succeeded or not
    pub async fn run_then_sign_out<F: Future>(&self, work: F) -> F::Output {
        let output = work.await;
        self.sign_out().await;
        output
    }

    /// Currently signed-in user, if any
    pub async fn current_user(&self) -> Option<AuthUser> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Ensure a usable session exists, refreshing it when close to expiry
    pub async fn require_session(&self) -> ClientResult<AuthUser> {
        let (user, expired) = match self.session.read().await.as_ref() {
            Some(session) => (session.user.clone(), session.is_expired(Utc::now())),
            None => return Err(ClientError::NotAuthenticated),
        };

        if expired {
            debug!(user_id = %user.id, "Session expiring, refreshing");
            return self.refresh_session().await;
        }
        Ok(user)
    }
}
