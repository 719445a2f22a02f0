//! `stockroom-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model and the strongly-typed identifiers for categories and products.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ProductId};
