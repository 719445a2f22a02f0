use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, DomainError, DomainResult, ProductId};

/// Read projection of a product joined with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    /// Name of the owning category; `None` if the reference no longer resolves.
    pub category: Option<String>,
}

/// Input for adding a product.
///
/// When `id` is `None` the service mints one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub category_name: String,
    /// Description used if the category has to be created.
    pub description: Option<String>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        quantity: i64,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            quantity,
            category_name: category_name.into(),
            description: None,
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trim text fields and check the value ranges.
    pub fn normalized(self) -> DomainResult<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name is required"));
        }
        let category_name = self.category_name.trim();
        if category_name.is_empty() {
            return Err(DomainError::validation("category name is required"));
        }
        validate_price(self.price)?;
        validate_quantity(self.quantity)?;

        Ok(Self {
            id: self.id,
            name: name.to_string(),
            price: self.price,
            quantity: self.quantity,
            category_name: category_name.to_string(),
            description: self.description,
        })
    }
}

/// Row written to the products table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub category_id: CategoryId,
}

/// Sparse update of the mutable product fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl ProductUpdate {
    pub fn price(price: f64) -> Self {
        Self {
            price: Some(price),
            quantity: None,
        }
    }

    pub fn quantity(quantity: i64) -> Self {
        Self {
            price: None,
            quantity: Some(quantity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.quantity.is_none()
    }

    /// At least one field must be present, and present values must be in range.
    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("no valid fields to update"));
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(())
    }
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation(
            "price must be a finite, non-negative number",
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity must not be negative"));
    }
    Ok(())
}
