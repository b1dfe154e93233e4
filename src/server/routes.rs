//! Request handlers
//!
//! Bodies are JSON except for images, which are served as PNG. Failures
//! answer with a bare `"404"` or `"500"` body.

use crate::catalog::Catalog;
use crate::client::MAX_IMAGE_SIZE;
use crate::extract::ProductIdentity;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Second path segment of `/meta/:id/:view` listing the group names
pub const OVERVIEW_VIEW: &str = "overview";

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404").into_response()
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "500").into_response()
}

/// Resolves a path segment to a product, reusing a searched identity if any
fn resolve_part(catalog: &Catalog, raw: &str) -> Option<ProductIdentity> {
    let number = match raw.parse::<u64>() {
        Ok(number) => number,
        Err(e) => {
            tracing::debug!("Rejecting article number '{}': {}", raw, e);
            return None;
        }
    };

    Some(
        catalog
            .get_identity(number)
            .unwrap_or_else(|| ProductIdentity::from_number(number)),
    )
}

/// `GET /search/:query`
pub async fn search(State(catalog): State<Catalog>, Path(query): Path<String>) -> Response {
    match catalog.find_identities(&query).await {
        Ok(parts) => Json(parts).into_response(),
        Err(e) => {
            tracing::error!("Search '{}' failed: {}", query, e);
            internal_error()
        }
    }
}

/// `GET /price/:id`
pub async fn price(State(catalog): State<Catalog>, Path(id): Path<String>) -> Response {
    let Some(part) = resolve_part(&catalog, &id) else {
        return not_found();
    };

    Json(catalog.get_price(&part).await).into_response()
}

/// `GET /meta/:id`
pub async fn meta(State(catalog): State<Catalog>, Path(id): Path<String>) -> Response {
    let Some(part) = resolve_part(&catalog, &id) else {
        return not_found();
    };

    match catalog.get_specifications(&part).await {
        Ok(table) => Json(&*table).into_response(),
        Err(e) => {
            tracing::warn!("Metadata for {} failed: {}", part, e);
            internal_error()
        }
    }
}

/// `GET /meta/:id/:view`
///
/// `overview` lists the group names; anything else selects one group.
pub async fn meta_view(
    State(catalog): State<Catalog>,
    Path((id, view)): Path<(String, String)>,
) -> Response {
    let Some(part) = resolve_part(&catalog, &id) else {
        return not_found();
    };

    let table = match catalog.get_specifications(&part).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("Metadata for {} failed: {}", part, e);
            return internal_error();
        }
    };

    if view.eq_ignore_ascii_case(OVERVIEW_VIEW) {
        let mut headlines: Vec<&str> = table.keys().map(String::as_str).collect();
        headlines.sort_unstable();
        return Json(headlines).into_response();
    }

    match table.get(&view) {
        Some(group) => Json(group).into_response(),
        None => not_found(),
    }
}

/// `GET /image/:id`
pub async fn image(State(catalog): State<Catalog>, Path(id): Path<String>) -> Response {
    let Some(part) = resolve_part(&catalog, &id) else {
        return not_found();
    };

    let (width, height) = MAX_IMAGE_SIZE;
    let blob = match catalog.get_image(&part, width, height).await {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!("Image for {} failed: {}", part, e);
            return internal_error();
        }
    };

    match blob.to_png() {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => {
            tracing::error!("Could not encode PNG for {}: {}", part, e);
            internal_error()
        }
    }
}

/// Anything not routed
pub async fn fallback() -> Response {
    not_found()
}
