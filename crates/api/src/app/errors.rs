use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use stockroom_core::DomainError;
use stockroom_inventory::{InventoryError, StoreError};

use crate::app::dto::Envelope;

pub fn inventory_error_to_response(err: InventoryError) -> Response {
    match err {
        InventoryError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        InventoryError::NotFound(what) => json_error(StatusCode::NOT_FOUND, format!("{what} not found")),
        InventoryError::Store(StoreError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, format!("conflict: {msg}"))
        }
        InventoryError::Store(StoreError::Database(msg)) => {
            tracing::error!("store failure: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal storage error")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    inventory_error_to_response(err.into())
}

pub fn rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(
        StatusCode::BAD_REQUEST,
        format!("invalid request body: {}", rejection.body_text()),
    )
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::error(message))).into_response()
}
