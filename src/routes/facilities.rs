use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;
use crate::models::{Coordinates, Facility, FacilityRequest, JobStartedResponse};
use crate::routes::{error_response, store_error_response, AppState};
use crate::services::{backfill_coordinates, CacheManager, Geocoder};

/// Configure facility management routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/facilities", web::get().to(list_facilities))
        .route("/facilities", web::post().to(create_facility))
        .route("/facilities/coordinates", web::post().to(start_backfill))
        .route("/facilities/{id}", web::get().to(get_facility))
        .route("/facilities/{id}", web::put().to(update_facility))
        .route("/facilities/{id}", web::delete().to(delete_facility))
        .route("/dashboard/facilities", web::get().to(my_facilities));
}

/// Every facility, ordered by name
async fn list_facilities(state: web::Data<AppState>) -> impl Responder {
    match state.facilities().await {
        Ok(facilities) => HttpResponse::Ok().json(facilities),
        Err(e) => store_error_response("Failed to load facilities", e),
    }
}

async fn get_facility(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.postgres.get_facility(path.into_inner()).await {
        Ok(facility) => HttpResponse::Ok().json(facility),
        Err(e) => store_error_response("Failed to load facility", e),
    }
}

/// Facilities owned by the signed-in administrator
async fn my_facilities(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let claims = match state.authenticate(&http_req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    match state.postgres.list_by_owner(claims.sub).await {
        Ok(facilities) => HttpResponse::Ok().json(facilities),
        Err(e) => store_error_response("Failed to load facilities", e),
    }
}

/// Create facility endpoint
///
/// POST /api/v1/facilities
///
/// The location text is geocoded before the insert. A failed lookup still
/// stores the facility, without coordinates.
async fn create_facility(
    state: web::Data<AppState>,
    req: web::Json<FacilityRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match state.authenticate(&http_req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let coordinates = locate(&state.geocoder, &state.cache, &req.location).await;

    match state.postgres.create_facility(claims.sub, &req, coordinates).await {
        Ok(facility) => {
            state.invalidate_facilities().await;
            HttpResponse::Created().json(facility)
        }
        Err(e) => store_error_response("Failed to create facility", e),
    }
}

/// Update facility endpoint
///
/// PUT /api/v1/facilities/{id}
///
/// Coordinates are kept when the location text is unchanged and re-resolved
/// when it changes.
async fn update_facility(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<FacilityRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match state.authenticate(&http_req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let id = path.into_inner();

    let existing = match state.postgres.get_facility(id).await {
        Ok(facility) => facility,
        Err(e) => return store_error_response("Failed to load facility", e),
    };

    if let Err(response) = ensure_owner(&existing, claims.sub) {
        return response;
    }

    let coordinates =
        updated_coordinates(&state.geocoder, &state.cache, &existing, &req.location).await;

    match state.postgres.update_facility(id, claims.sub, &req, coordinates).await {
        Ok(facility) => {
            state.invalidate_facilities().await;
            HttpResponse::Ok().json(facility)
        }
        Err(e) => store_error_response("Failed to update facility", e),
    }
}

async fn delete_facility(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
) -> impl Responder {
    let claims = match state.authenticate(&http_req) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    match state.postgres.delete_facility(path.into_inner(), claims.sub).await {
        Ok(()) => {
            state.invalidate_facilities().await;
            HttpResponse::NoContent().finish()
        }
        Err(e) => store_error_response("Failed to delete facility", e),
    }
}

/// Start the coordinate backfill in the background
///
/// POST /api/v1/facilities/coordinates
async fn start_backfill(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    if let Err(response) = state.authenticate(&http_req) {
        return response;
    }

    let state = state.get_ref().clone();

    actix_web::rt::spawn(async move {
        match backfill_coordinates(state.postgres.as_ref(), &state.geocoder).await {
            Ok(summary) if summary.updated > 0 => state.invalidate_facilities().await,
            Ok(_) => {}
            Err(e) => tracing::error!("Coordinate backfill failed: {}", e),
        }
    });

    HttpResponse::Accepted().json(JobStartedResponse {
        message: "Update process started".to_string(),
    })
}

/// Only the facility's own administrator may edit it
pub fn ensure_owner(existing: &Facility, user_id: Uuid) -> Result<(), HttpResponse> {
    if existing.owner_id == Some(user_id) {
        return Ok(());
    }

    Err(error_response(
        StatusCode::FORBIDDEN,
        "Forbidden",
        "Only the facility's administrator can edit it",
    ))
}

/// Coordinates for an edited facility: kept while the location text is
/// unchanged, re-resolved when it changes
pub async fn updated_coordinates(
    geocoder: &Geocoder,
    cache: &CacheManager,
    existing: &Facility,
    location: &str,
) -> Option<Coordinates> {
    if existing.location.trim() == location.trim() {
        return existing.coordinates;
    }

    tracing::debug!("Location changed for facility {}, re-geocoding", existing.id);
    locate(geocoder, cache, location).await
}

/// Geocode a facility location, degrading to no coordinates on failure
pub async fn locate(geocoder: &Geocoder, cache: &CacheManager, location: &str) -> Option<Coordinates> {
    match geocoder.resolve_cached(cache, location).await {
        Ok(Some(coordinates)) => Some(coordinates),
        Ok(None) => {
            tracing::warn!("No coordinates found for location: {}", location);
            None
        }
        Err(e) => {
            tracing::warn!("Geocoding failed for {:?}, storing without coordinates: {}", location, e);
            None
        }
    }
}
