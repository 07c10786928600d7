//! Product Catalog API Endpoints
//! Mission: Expose CRUD and query endpoints over the product store

use crate::catalog::{
    models::{ErrorResponse, FieldError, Page, ProductRequest, ProductResponse},
    store::{self, ProductQuery, ProductStore},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Shared catalog state
#[derive(Clone)]
pub struct CatalogState {
    pub store: Arc<ProductStore>,
}

/// Query parameters for GET /products
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// List products - GET /products
pub async fn list_products(
    State(state): State<CatalogState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Page<ProductResponse>>, CatalogApiError> {
    let sort_by = params.sort_by.unwrap_or_else(|| "id".to_string());
    let sort_col = store::sort_column(&sort_by)
        .ok_or_else(|| CatalogApiError::BadRequest(format!("Unknown sort field: {}", sort_by)))?;

    let query = ProductQuery {
        search: params.search.filter(|s| !s.trim().is_empty()),
        category: params.category,
        page: params.page.unwrap_or(0).max(0),
        size: params.size.unwrap_or(10).clamp(1, 1000),
        sort_col,
        descending: params
            .sort_dir
            .as_deref()
            .is_some_and(|dir| dir.eq_ignore_ascii_case("desc")),
    };

    let page = state.store.search(&query)?;
    Ok(Json(page.map(|p| ProductResponse::from_product(&p))))
}

/// Get a product by id - GET /products/:id
pub async fn get_product(
    State(state): State<CatalogState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, CatalogApiError> {
    state
        .store
        .find_by_id(id)?
        .map(|p| Json(ProductResponse::from_product(&p)))
        .ok_or(CatalogApiError::NotFound(id))
}

/// Create a product - POST /products
pub async fn create_product(
    State(state): State<CatalogState>,
    Json(payload): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), CatalogApiError> {
    let new_product = payload.validate().map_err(CatalogApiError::Validation)?;
    let product = state.store.insert(&new_product)?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_product(&product)),
    ))
}

/// Update a product - PUT /products/:id
pub async fn update_product(
    State(state): State<CatalogState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, CatalogApiError> {
    let new_product = payload.validate().map_err(CatalogApiError::Validation)?;
    state
        .store
        .update(id, &new_product)?
        .map(|p| Json(ProductResponse::from_product(&p)))
        .ok_or(CatalogApiError::NotFound(id))
}

/// Delete a product - DELETE /products/:id
pub async fn delete_product(
    State(state): State<CatalogState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CatalogApiError> {
    if state.store.delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CatalogApiError::NotFound(id))
    }
}

/// Total product count - GET /products/count
pub async fn count_products(
    State(state): State<CatalogState>,
) -> Result<Json<i64>, CatalogApiError> {
    Ok(Json(state.store.count()?))
}

/// Per-category product count - GET /products/count/:category
pub async fn count_by_category(
    State(state): State<CatalogState>,
    Path(category): Path<String>,
) -> Result<Json<i64>, CatalogApiError> {
    Ok(Json(state.store.count_by_category(&category)?))
}

/// Catalog API errors
#[derive(Debug)]
pub enum CatalogApiError {
    Database(anyhow::Error),
    NotFound(i64),
    BadRequest(String),
    Validation(Vec<FieldError>),
}

impl From<anyhow::Error> for CatalogApiError {
    fn from(err: anyhow::Error) -> Self {
        CatalogApiError::Database(err)
    }
}

impl IntoResponse for CatalogApiError {
    fn into_response(self) -> Response {
        match self {
            CatalogApiError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            CatalogApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Product not found with id: {}", id) })),
            )
                .into_response(),
            CatalogApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            CatalogApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "Validation failed",
                    errors,
                    StatusCode::BAD_REQUEST.as_u16(),
                )),
            )
                .into_response(),
        }
    }
}
