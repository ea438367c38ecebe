use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{Coordinates, FacilityType, Insurance, SearchResult, Service, SortKey};

/// Radius choices offered to searchers, in miles
pub const RADIUS_OPTIONS: &[u16] = &[5, 10, 25, 50];

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
    /// Reference point the distances were measured from
    pub coordinates: Option<Coordinates>,
}

impl SearchResponse {
    /// Cut one page out of the full ranked list
    pub fn page(
        results: Vec<SearchResult>,
        offset: usize,
        limit: usize,
        coordinates: Option<Coordinates>,
    ) -> Self {
        let total = results.len();
        let page: Vec<SearchResult> = results.into_iter().skip(offset).take(limit).collect();
        let has_more = offset.saturating_add(page.len()) < total;

        Self {
            results: page,
            total,
            offset,
            limit,
            has_more,
            coordinates,
        }
    }
}

/// Enumerations a client needs to build a search form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    #[serde(rename = "facilityTypes")]
    pub facility_types: Vec<FacilityType>,
    pub insurances: Vec<Insurance>,
    pub services: Vec<Service>,
    #[serde(rename = "sortKeys")]
    pub sort_keys: Vec<SortKey>,
    #[serde(rename = "radiusMiles")]
    pub radius_miles: Vec<u16>,
}

impl Default for OptionsResponse {
    fn default() -> Self {
        Self {
            facility_types: FacilityType::ALL.to_vec(),
            insurances: Insurance::ALL.to_vec(),
            services: Service::ALL.to_vec(),
            sort_keys: SortKey::ALL.to_vec(),
            radius_miles: RADIUS_OPTIONS.to_vec(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}

/// Successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<i64>,
}

/// Session probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

/// Acknowledgement for background jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStartedResponse {
    pub message: String,
}
