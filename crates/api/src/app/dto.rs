use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, ProductId};
use stockroom_inventory::{NewProduct, ProductUpdate};

// -------------------------
// Response envelope
// -------------------------

/// Wrapper around every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products`. Fields are optional here so that missing ones
/// can be reported together as a validation error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub category_name: Option<String>,
    pub description: Option<String>,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> Result<NewProduct, DomainError> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.quantity.is_none() {
            missing.push("quantity");
        }
        if self.category_name.is_none() {
            missing.push("category_name");
        }
        if self.description.is_none() {
            missing.push("description");
        }

        let (Some(name), Some(price), Some(quantity), Some(category_name), Some(description)) = (
            self.name,
            self.price,
            self.quantity,
            self.category_name,
            self.description,
        ) else {
            return Err(DomainError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        };

        // A blank id asks for a minted one.
        let id = match self.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(ProductId::parse(raw)?),
            _ => None,
        };

        Ok(NewProduct {
            id,
            name,
            price,
            quantity,
            category_name,
            description: Some(description),
        })
    }
}

/// Body of `PUT /products/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(value: UpdateProductRequest) -> Self {
        ProductUpdate {
            price: value.price,
            quantity: value.quantity,
        }
    }
}

/// Body of `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub product_id: ProductId,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn json_ok<T: Serialize>(status: StatusCode, message: impl Into<String>, data: T) -> Response {
    (status, Json(Envelope::ok(message, data))).into_response()
}

pub fn json_ok_empty(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::ok_empty(message))).into_response()
}
