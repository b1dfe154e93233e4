//! REST-style dispatcher
//!
//! Routes:
//! - `GET /search/:query` - identities matching a free-text query
//! - `GET /price/:id` - current price, `0` when unknown
//! - `GET /meta/:id` - full specification table
//! - `GET /meta/:id/overview` - group names only
//! - `GET /meta/:id/:group` - a single group
//! - `GET /image/:id` - product image as PNG

mod routes;

pub use routes::OVERVIEW_VIEW;

use crate::catalog::Catalog;
use crate::Result;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the dispatcher over a catalog
pub fn router(catalog: Catalog) -> Router {
    Router::new()
        .route("/search/:query", get(routes::search))
        .route("/price/:id", get(routes::price))
        .route("/meta/:id", get(routes::meta))
        .route("/meta/:id/:view", get(routes::meta_view))
        .route("/image/:id", get(routes::image))
        .fallback(routes::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

/// Binds `addr` and serves the dispatcher until the process ends
pub async fn serve(addr: &str, catalog: Catalog) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving on {}", listener.local_addr()?);

    axum::serve(listener, router(catalog)).await?;
    Ok(())
}
