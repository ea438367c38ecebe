use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{LoginRequest, LoginResponse, SessionResponse};
use crate::routes::{error_response, AppState};
use crate::services::{bearer_token, SupabaseError};

/// Configure administrator session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/auth/login", web::post().to(login))
        .route("/auth/logout", web::post().to(logout))
        .route("/auth/session", web::get().to(session));
}

async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    match state.sessions.sign_in(&req.email, &req.password).await {
        Ok(session) => HttpResponse::Ok().json(LoginResponse {
            access_token: session.access_token,
            user_id: session.user_id,
            expires_at: session.expires_at,
        }),
        Err(SupabaseError::InvalidCredentials) => error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
            "Invalid email or password",
        ),
        Err(e) => {
            tracing::error!("Sign-in failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "Sign-in failed", e.to_string())
        }
    }
}

async fn logout(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let token = http_req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let Some(token) = token else {
        return HttpResponse::NoContent().finish();
    };

    if let Err(e) = state.sessions.sign_out(token).await {
        tracing::warn!("Sign-out failed: {}", e);
    }

    HttpResponse::NoContent().finish()
}

/// Whether the presented token is a valid session
async fn session(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = state.authenticate(&http_req).ok().map(|claims| claims.sub);

    HttpResponse::Ok().json(SessionResponse {
        authenticated: user_id.is_some(),
        user_id,
    })
}
