//! Cache key generators for consistent key naming.

use crate::catalog::ProductFilter;

/// Tag for single-product entries.
const PRODUCT_TAG: &str = "product";

/// Tag for filtered product list entries.
const FILTER_TAG: &str = "products-filter";

/// Rendered in place of a filter field that was not supplied.
const ANY: &str = "any";

/// Generate a cache key for a product by ID.
#[must_use]
pub fn product_by_id(id: i64) -> String {
    format!("{}-{}", PRODUCT_TAG, id)
}

/// Generate a cache key for a filtered product listing.
///
/// Fields are rendered in fixed order (category, then max price), each as its
/// value or `any` when absent. A price of `-0.0` renders like `0.0`.
#[must_use]
pub fn products_by_filter(filter: &ProductFilter) -> String {
    let category = filter
        .category_id
        .map_or_else(|| ANY.to_string(), |c| c.to_string());
    let max_price = filter
        .max_price
        .map_or_else(|| ANY.to_string(), |p| (p + 0.0).to_string());
    format!("{}-{}-{}", FILTER_TAG, category, max_price)
}
