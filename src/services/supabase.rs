use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when talking to Supabase Auth
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Claims carried by a Supabase access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Signed-in administrator session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: Uuid,
    pub expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: Uuid,
}

/// Supabase Auth client and token verifier
///
/// Holds the project keys; no session state is kept here. Callers present
/// their access token on every request.
pub struct SessionManager {
    base_url: String,
    anon_key: String,
    decoding_key: DecodingKey,
    validation: Validation,
    client: Client,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(base_url: String, anon_key: String, jwt_secret: &str) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["authenticated"]);

        Ok(Self {
            base_url,
            anon_key,
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
            client,
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Exchange email and password for an access token
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        let response = self
            .client
            .post(self.auth_url("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 401 {
            return Err(SupabaseError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(SupabaseError::ApiError(format!("Sign-in failed: {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(e.to_string()))?;

        tracing::info!("Administrator {} signed in", token.user.id);

        Ok(Session {
            access_token: token.access_token,
            user_id: token.user.id,
            expires_at: token.expires_at,
        })
    }

    /// Revoke the session behind an access token
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Sign-out failed: {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Verify an access token locally with the project JWT secret
    pub fn verify(&self, access_token: &str) -> Result<Claims, SupabaseError> {
        decode::<Claims>(access_token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| SupabaseError::Unauthorized(e.to_string()))
    }

    pub fn is_authenticated(&self, access_token: &str) -> bool {
        self.verify(access_token).is_ok()
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
