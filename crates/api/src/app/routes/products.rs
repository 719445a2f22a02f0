use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use stockroom_core::ProductId;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    ProductId::parse(raw).map_err(errors::domain_error_to_response)
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.get_all_products().await {
        Ok(items) => dto::json_ok(StatusCode::OK, format!("{} products", items.len()), items),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_product(&id).await {
        Ok(Some(product)) => dto::json_ok(StatusCode::OK, "product found", product),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };
    let input = match body.into_new_product() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.add_product(input).await {
        Ok(product_id) => dto::json_ok(
            StatusCode::CREATED,
            "Product added successfully!",
            dto::CreatedProduct { product_id },
        ),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services.update_product(&id, body.into()).await {
        Ok(()) => dto::json_ok_empty(StatusCode::OK, "Product updated successfully!"),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.remove_product(&id).await {
        Ok(true) => dto::json_ok_empty(StatusCode::OK, "Product removed successfully!"),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
