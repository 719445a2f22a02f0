use axum::{Router, routing::get};

pub mod categories;
pub mod products;
pub mod system;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/summary", get(system::summary))
        .nest("/products", products::router())
        .nest("/categories", categories::router())
}
