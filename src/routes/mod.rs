// Route exports
pub mod auth;
pub mod facilities;
pub mod search;

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use crate::config::SearchSettings;
use crate::core::MatchEngine;
use crate::models::{ErrorResponse, Facility};
use crate::services::{
    bearer_token, CacheKey, CacheManager, Claims, Geocoder, PostgresClient, PostgresError,
    SessionManager,
};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub geocoder: Arc<Geocoder>,
    pub sessions: Arc<SessionManager>,
    pub engine: MatchEngine,
    pub search: SearchSettings,
}

impl AppState {
    /// Facility list for searches, served from cache when possible.
    ///
    /// Owner ids are not serialized, so cached entries carry none; ownership
    /// checks read from the store.
    pub async fn facilities(&self) -> Result<Vec<Facility>, PostgresError> {
        let key = CacheKey::facilities();

        if let Ok(cached) = self.cache.get::<Vec<Facility>>(&key).await {
            return Ok(cached);
        }

        let facilities = self.postgres.list_facilities().await?;

        if let Err(e) = self.cache.set(&key, &facilities).await {
            tracing::warn!("Failed to cache facility list: {}", e);
        }

        Ok(facilities)
    }

    /// Drop the cached facility list after any write
    pub async fn invalidate_facilities(&self) {
        if let Err(e) = self.cache.delete(&CacheKey::facilities()).await {
            tracing::warn!("Failed to invalidate facility cache: {}", e);
        }
    }

    /// Verify the caller's bearer token
    pub fn authenticate(&self, req: &HttpRequest) -> Result<Claims, HttpResponse> {
        let token = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized",
                    "A bearer token is required",
                )
            })?;

        self.sessions.verify(token).map_err(|e| {
            tracing::debug!("Rejected access token: {}", e);
            error_response(StatusCode::UNAUTHORIZED, "Unauthorized", e.to_string())
        })
    }
}

/// JSON error body with a matching status code
pub fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(error, message, status.as_u16()))
}

/// Map store failures onto HTTP statuses
pub fn store_error_response(context: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(what) => {
            error_response(StatusCode::NOT_FOUND, "Not found", format!("{} not found", what))
        }
        other => {
            tracing::error!("{}: {}", context, other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context, other.to_string())
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(search::configure)
            .configure(facilities::configure)
            .configure(auth::configure),
    );
}
