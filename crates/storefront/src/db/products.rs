//! Product catalog queries.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::Product;

use super::RepositoryError;

/// Maximum number of rows returned by a tool-driven search.
pub const SEARCH_LIMIT: i64 = 5;

/// Sort order for price-sorted searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first.
    Ascending,
    /// Most expensive first.
    Descending,
}

impl SortOrder {
    /// Parse the wire value used by the search tool.
    ///
    /// Unknown values fall back to `None` (default `id` ordering) rather
    /// than failing the search.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Filters for a catalog search. All fields are optional and combine
/// conjunctively.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Case-insensitive substring match against the product name.
    pub query: Option<String>,
    /// Exact category match (canonicalized before querying).
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Price sort; `None` sorts by id for stable results.
    pub sort: Option<SortOrder>,
}

/// Canonicalize a category value to the catalog's capitalization
/// (first letter upper, rest lower), so model-supplied values like
/// "electronics" or "SHOES" match the stored rows.
#[must_use]
pub fn canonical_category(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the full catalog for the shop page, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, product_name, price, category, image_url
             FROM product
             ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn find_by_id(&self, id: i64) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, product_name, price, category, image_url
             FROM product
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Search the catalog with the given filters.
    ///
    /// Results are capped at [`SEARCH_LIMIT`] rows. With no sort specified
    /// the ordering is by id so repeated identical searches return the same
    /// rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Product>, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, product_name, price, category, image_url FROM product WHERE TRUE",
        );

        if let Some(query) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            builder.push(" AND product_name ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(query)));
        }

        if let Some(category) = params.category.as_deref().filter(|c| !c.trim().is_empty()) {
            builder.push(" AND category = ");
            builder.push_bind(canonical_category(category));
        }

        if let Some(min) = params.min_price {
            builder.push(" AND price >= ");
            builder.push_bind(min);
        }

        if let Some(max) = params.max_price {
            builder.push(" AND price <= ");
            builder.push_bind(max);
        }

        match params.sort {
            Some(SortOrder::Ascending) => builder.push(" ORDER BY price ASC"),
            Some(SortOrder::Descending) => builder.push(" ORDER BY price DESC"),
            None => builder.push(" ORDER BY id ASC"),
        };

        builder.push(" LIMIT ");
        builder.push_bind(SEARCH_LIMIT);

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }
}

/// Escape LIKE metacharacters in user-supplied search text so "50%" matches
/// literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_category() {
        assert_eq!(canonical_category("electronics"), "Electronics");
        assert_eq!(canonical_category("SHOES"), "Shoes");
        assert_eq!(canonical_category(" accessories "), "Accessories");
        assert_eq!(canonical_category("Clothing"), "Clothing");
        assert_eq!(canonical_category(""), "");
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse(" asc "), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("cheapest"), None);
        assert_eq!(SortOrder::parse(""), None);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
