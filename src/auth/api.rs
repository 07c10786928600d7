//! Authentication API Endpoints
//! Mission: Provide the admin login endpoint

use crate::auth::{
    admin_store::AdminStore,
    jwt::JwtHandler,
    models::{LoginRequest, LoginResponse},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub admin_store: Arc<AdminStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(admin_store: Arc<AdminStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            admin_store,
            jwt_handler,
        }
    }
}

/// Login endpoint - POST /auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    info!("🔐 Login attempt: {}", payload.username);

    // Lookup miss and password mismatch collapse into the same error so the
    // failure surface stays non-enumerable.
    let admin = state
        .admin_store
        .find_by_username(&payload.username)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::InvalidCredentials)?;

    let valid = bcrypt::verify(&payload.password, &admin.password_hash)
        .map_err(|_| AuthApiError::InternalError)?;

    if !valid {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(AuthApiError::InvalidCredentials);
    }

    let (token, expires_in) = state
        .jwt_handler
        .generate_token(&admin.username)
        .map_err(|_| AuthApiError::InternalError)?;

    info!("✅ Login successful: {}", admin.username);

    Ok(Json(LoginResponse::bearer(token, expires_in, admin.username)))
}

/// Token check endpoint - GET /auth/validate
///
/// Sits behind the auth middleware; reaching the handler at all means the
/// bearer token was accepted.
pub async fn validate() -> &'static str {
    "Token is valid"
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password")
            }
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
