//! HTTP router assembly.
//!
//! Public login and health routes plus the JWT-protected catalog surface.

use crate::{
    auth::{api as auth_api, auth_middleware, AuthState, JwtHandler},
    catalog::{api as catalog_api, CatalogState},
    middleware::request_logging,
};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Create the API router
pub fn create_router(
    auth_state: AuthState,
    catalog_state: CatalogState,
    jwt_handler: Arc<JwtHandler>,
) -> Router {
    let auth_router = Router::new()
        .route("/auth/login", post(auth_api::login))
        .with_state(auth_state);

    let protected_routes = Router::new()
        .route(
            "/products",
            get(catalog_api::list_products).post(catalog_api::create_product),
        )
        .route("/products/count", get(catalog_api::count_products))
        .route(
            "/products/count/:category",
            get(catalog_api::count_by_category),
        )
        .route(
            "/products/:id",
            get(catalog_api::get_product)
                .put(catalog_api::update_product)
                .delete(catalog_api::delete_product),
        )
        .route("/auth/validate", get(auth_api::validate))
        .route_layer(middleware::from_fn_with_state(jwt_handler, auth_middleware))
        .with_state(catalog_state);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
