use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::MatchError;
use crate::models::{
    Address, Coordinates, HealthResponse, OptionsResponse, SearchRequest, SearchResponse,
};
use crate::routes::{error_response, AppState};
use crate::services::{CacheManager, Geocoder};

/// Configure search and metadata routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/options", web::get().to(options))
        .route("/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Tag enumerations, sort keys and radius choices for building a search form
async fn options() -> impl Responder {
    HttpResponse::Ok().json(OptionsResponse::default())
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "filters": {
///     "facilityName": "harbor",
///     "facilityTypes": ["Skilled Nursing Facility"],
///     "insurances": ["Medicaid"],
///     "services": ["PT"],
///     "availableBeds": "yes",
///     "radius": 25
///   },
///   "location": "Providence, RI",
///   "sortBy": "match",
///   "offset": 0,
///   "limit": 5
/// }
/// ```
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();

    let coordinates = match resolve_reference(&state.geocoder, &state.cache, &req).await {
        Ok(coordinates) => coordinates,
        Err(response) => return response,
    };

    let mut filters = req.filters;
    filters.coordinates = coordinates;
    let limit = req
        .limit
        .unwrap_or(state.search.default_limit)
        .min(state.search.max_limit) as usize;

    let facilities = match state.facilities().await {
        Ok(facilities) => facilities,
        Err(e) => {
            tracing::error!("Failed to load facilities: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load facilities",
                e.to_string(),
            );
        }
    };

    let results = match state.engine.search(&facilities, &filters, req.sort_by) {
        Ok(results) => results,
        Err(e) => return match_error_response(&e),
    };

    let response = SearchResponse::page(results, req.offset, limit, filters.coordinates);

    tracing::info!(
        "Returning {} of {} matching facilities (from {} total)",
        response.results.len(),
        response.total,
        facilities.len()
    );

    HttpResponse::Ok().json(response)
}

/// Reference point for a search
///
/// Coordinates sent with the filters are used as-is. Otherwise the free-text
/// location, then the structured address, is geocoded. A failed lookup only
/// fails the search when a radius needs the point; without one the search
/// runs without distances.
pub async fn resolve_reference(
    geocoder: &Geocoder,
    cache: &CacheManager,
    req: &SearchRequest,
) -> Result<Option<Coordinates>, HttpResponse> {
    if let Some(coordinates) = req.filters.coordinates {
        return Ok(Some(coordinates));
    }

    let query = req
        .location
        .clone()
        .filter(|text| !text.trim().is_empty())
        .or_else(|| req.address.as_ref().map(Address::to_query));

    let Some(query) = query else {
        return Ok(None);
    };

    let radius_active = req.filters.radius.is_some();

    match geocoder.resolve_cached(cache, &query).await {
        Ok(Some(coordinates)) => Ok(Some(coordinates)),
        Ok(None) if radius_active => Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Address not found",
            format!("Could not locate {:?}", query),
        )),
        Ok(None) => {
            tracing::info!("Reference location {:?} not found, searching without distance", query);
            Ok(None)
        }
        Err(e) if radius_active => {
            tracing::error!("Geocoding failed for {:?}: {}", query, e);
            Err(error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Failed to get location coordinates",
                e.to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!("Geocoding failed for {:?}, searching without distance: {}", query, e);
            Ok(None)
        }
    }
}

/// Bad stored facility data is a server fault; bad filters are the caller's
pub fn match_error_response(err: &MatchError) -> HttpResponse {
    if err.is_stored_data() {
        tracing::error!("Stored facility data failed validation: {}", err);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Invalid facility data",
            err.to_string(),
        );
    }

    tracing::info!("Rejected search: {}", err);
    error_response(StatusCode::BAD_REQUEST, "Invalid search", err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_filter_errors_are_bad_requests() {
        let response = match_error_response(&MatchError::InvalidRadius(-1.0));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = match_error_response(&MatchError::InvalidReference { lat: 91.0, lng: 0.0 });
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_stored_coordinate_errors_are_server_errors() {
        let err = MatchError::InvalidFacilityCoordinates {
            id: Uuid::new_v4(),
            lat: 95.0,
            lng: 0.0,
        };

        let response = match_error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
