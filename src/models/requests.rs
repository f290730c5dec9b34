//! Request DTOs for the product API
//!
//! Defines query strings and bodies accepted by the HTTP layer.

use serde::Deserialize;

use crate::catalog::Product;

/// Query string for listing products (GET /products)
///
/// Both fields are optional; an absent field matches every product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Inclusive upper price bound
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl ProductQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.max_price {
            Some(price) if !price.is_finite() => Some("maxPrice must be a finite number".to_string()),
            Some(price) if price < 0.0 => Some("maxPrice cannot be negative".to_string()),
            _ => None,
        }
    }
}

/// Request body for replacing a product (PUT /products/:id)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub category_id: i64,
    pub price: f64,
    #[serde(default)]
    pub name: String,
}

impl UpdateProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if !self.price.is_finite() {
            return Some("price must be a finite number".to_string());
        }
        if self.price < 0.0 {
            return Some("price cannot be negative".to_string());
        }
        None
    }

    /// Builds the product record to store under `id`.
    pub fn into_product(self, id: i64) -> Product {
        Product::new(id, self.category_id, self.price, self.name)
    }
}
