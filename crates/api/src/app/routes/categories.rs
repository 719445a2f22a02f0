use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:name", get(get_category).delete(delete_category))
        .route("/:name/products", get(list_category_products))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.get_all_categories().await {
        Ok(items) => dto::json_ok(StatusCode::OK, format!("{} categories", items.len()), items),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateCategoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services
        .add_category(&body.name, body.description.as_deref())
        .await
    {
        Ok(()) => dto::json_ok_empty(StatusCode::CREATED, "Category added successfully!"),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.get_category(&name).await {
        Ok(Some(category)) => dto::json_ok(StatusCode::OK, "category found", category),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn list_category_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.get_products_by_category(&name).await {
        Ok(items) => dto::json_ok(StatusCode::OK, format!("{} products", items.len()), items),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.remove_category(&name).await {
        Ok(true) => dto::json_ok_empty(StatusCode::OK, "Category removed successfully!"),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
