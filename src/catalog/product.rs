//! Product records and filter criteria.

use serde::{Deserialize, Serialize};

// == Product ==
/// A product record as returned by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub price: f64,
    #[serde(default)]
    pub name: String,
}

impl Product {
    pub fn new(id: i64, category_id: i64, price: f64, name: impl Into<String>) -> Self {
        Self {
            id,
            category_id,
            price,
            name: name.into(),
        }
    }
}

// == Product Filter ==
/// Optional criteria for listing products. Absent fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
}

impl ProductFilter {
    pub fn new(category_id: Option<i64>, max_price: Option<f64>) -> Self {
        Self {
            category_id,
            max_price,
        }
    }

    /// Returns true if `product` satisfies every present criterion.
    pub fn matches(&self, product: &Product) -> bool {
        self.category_id.map_or(true, |c| product.category_id == c)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}
