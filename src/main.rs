//! Product Catalog Backend
//! Mission: Product CRUD with JWT-secured admin access

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_backend::{
    auth::{AdminStore, AuthState, JwtHandler},
    catalog::{CatalogState, ProductStore},
    config::Config,
    routes::create_router,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    info!("🚀 Product catalog backend starting");

    let admin_store = Arc::new(AdminStore::new(&config.database_path)?);
    admin_store.ensure_default_admin(&config.admin_username, &config.admin_password)?;

    let product_store = Arc::new(ProductStore::new(&config.database_path)?);

    let jwt_handler = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    ));
    let auth_state = AuthState::new(admin_store, jwt_handler.clone());
    let catalog_state = CatalogState {
        store: product_store,
    };

    info!("🔐 Authentication initialized at: {}", config.database_path);

    let app = create_router(auth_state, catalog_state, jwt_handler);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter overrides
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
