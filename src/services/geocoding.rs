use crate::models::{Address, Coordinates};
use crate::services::cache::{CacheKey, CacheManager};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Errors that can occur when resolving an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoder rate limit exceeded")]
    RateLimited,

    #[error("Geocoder returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One hit from the Nominatim search API; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Nominatim geocoding client
///
/// Requests are spaced at least `min_interval` apart. The pacing state lives
/// in the client, so every caller sharing one `Geocoder` shares one budget.
pub struct Geocoder {
    endpoint: String,
    user_agent: String,
    country_codes: Option<String>,
    client: Client,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Geocoder {
    /// Create a new geocoder
    pub fn new(
        endpoint: String,
        user_agent: String,
        country_codes: Option<String>,
        min_interval: Duration,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            user_agent,
            country_codes,
            client,
            min_interval,
            last_request: Mutex::new(None),
        })
    }

    /// Resolve free text to coordinates
    ///
    /// Blank queries and queries with no hit resolve to `Ok(None)`.
    pub async fn resolve(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.wait_turn().await;

        let url = format!("{}/search", self.endpoint.trim_end_matches('/'));
        let mut params = vec![("q", query), ("format", "json"), ("limit", "1")];
        if let Some(codes) = self.country_codes.as_deref() {
            params.push(("countrycodes", codes));
        }

        tracing::debug!("Geocoding: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(GeocodeError::RateLimited),
            status => {
                return Err(GeocodeError::ApiError(format!(
                    "Geocoding request failed: {}",
                    status
                )))
            }
        }

        let hits: Vec<NominatimHit> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let Some(hit) = hits.first() else {
            tracing::debug!("No geocoding result for: {}", query);
            return Ok(None);
        };

        parse_hit(hit).map(Some)
    }

    /// Resolve a structured address
    pub async fn resolve_address(&self, address: &Address) -> Result<Option<Coordinates>, GeocodeError> {
        self.resolve(&address.to_query()).await
    }

    /// Resolve through the cache. Misses are cached too so an unknown
    /// address does not spend the rate budget twice.
    pub async fn resolve_cached(
        &self,
        cache: &CacheManager,
        query: &str,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        let key = CacheKey::geocode(query);

        if let Ok(cached) = cache.get::<Option<Coordinates>>(&key).await {
            return Ok(cached);
        }

        let resolved = self.resolve(query).await?;

        if let Err(e) = cache.set(&key, &resolved).await {
            tracing::warn!("Failed to cache geocoding result: {}", e);
        }

        Ok(resolved)
    }

    /// Sleep until `min_interval` has passed since the previous request
    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

fn parse_hit(hit: &NominatimHit) -> Result<Coordinates, GeocodeError> {
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude {:?}", hit.lat)))?;
    let lng = hit
        .lon
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude {:?}", hit.lon)))?;

    let coordinates = Coordinates::new(lat, lng);
    if !coordinates.is_valid() {
        return Err(GeocodeError::InvalidResponse(format!(
            "coordinates out of range: {}, {}",
            lat, lng
        )));
    }

    Ok(coordinates)
}
