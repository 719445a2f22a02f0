use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode};

use crate::app::{dto, errors, services::AppServices};

pub async fn health() -> axum::response::Response {
    dto::json_ok_empty(StatusCode::OK, "ok")
}

pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.summary().await {
        Ok(summary) => dto::json_ok(StatusCode::OK, summary.to_string(), summary),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
