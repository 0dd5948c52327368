//! The assistant's tool surface: a single catalog search function.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::warn;

use crate::db::{ProductRepository, SearchParams, SortOrder};

use super::error::GeminiError;
use super::types::{FunctionCall, FunctionDeclaration};

/// Name of the catalog search function declared to the model.
pub const SEARCH_PRODUCTS: &str = "search_products";

/// Errors from tool execution.
///
/// Only an unknown tool name is fatal; a failing search degrades to an
/// empty result list instead.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The model requested a tool that was never declared.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Error from the model API while running the tool loop.
    #[error(transparent)]
    Gemini(#[from] GeminiError),
}

/// Abstraction over tool execution, the second test seam of the assistant
/// loop.
pub trait ToolRunner: Send + Sync {
    /// Execute a function call and return its JSON result.
    fn run(
        &self,
        call: &FunctionCall,
    ) -> impl Future<Output = Result<serde_json::Value, ToolError>> + Send;
}

/// The declaration for [`SEARCH_PRODUCTS`] sent to the model.
///
/// All parameters are optional; the model combines whichever filters the
/// user's request implies.
#[must_use]
pub fn search_products_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        name: SEARCH_PRODUCTS.to_string(),
        description: "Search the store's product catalog. Combine any of the \
                      optional filters; omitted filters do not constrain the \
                      search. Returns at most 5 matching products."
            .to_string(),
        parameters: serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "query": {
                    "type": "STRING",
                    "description": "Substring to match against product names, case-insensitive"
                },
                "category": {
                    "type": "STRING",
                    "description": "Product category: Electronics, Clothing, Shoes, or Accessories"
                },
                "minPrice": {
                    "type": "NUMBER",
                    "description": "Minimum price, inclusive"
                },
                "maxPrice": {
                    "type": "NUMBER",
                    "description": "Maximum price, inclusive"
                },
                "sort": {
                    "type": "STRING",
                    "description": "Sort by price: 'asc' or 'desc'"
                }
            }
        }),
    }
}

/// Production tool runner backed by the product catalog.
#[derive(Clone)]
pub struct ProductTools {
    pool: PgPool,
}

impl ProductTools {
    /// Create a runner over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ToolRunner for ProductTools {
    async fn run(&self, call: &FunctionCall) -> Result<serde_json::Value, ToolError> {
        if call.name != SEARCH_PRODUCTS {
            return Err(ToolError::UnknownTool(call.name.clone()));
        }

        let params = parse_search_params(&call.args);

        // A failed search degrades to an empty list so the model can still
        // answer; the failure is logged for operators.
        let products = match ProductRepository::new(&self.pool).search(&params).await {
            Ok(products) => products,
            Err(err) => {
                warn!(error = %err, "product search failed, returning empty result");
                Vec::new()
            }
        };

        Ok(serde_json::json!({ "products": products }))
    }
}

/// Interpret the model-supplied arguments leniently: malformed or
/// unexpected values are treated as absent filters rather than errors.
fn parse_search_params(args: &serde_json::Value) -> SearchParams {
    SearchParams {
        query: string_arg(args, "query"),
        category: string_arg(args, "category"),
        min_price: decimal_arg(args, "minPrice"),
        max_price: decimal_arg(args, "maxPrice"),
        sort: string_arg(args, "sort").as_deref().and_then(SortOrder::parse),
    }
}

fn string_arg(args: &serde_json::Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Accepts JSON numbers and numeric strings; parses through the decimal
/// string form so float arguments keep their written precision.
fn decimal_arg(args: &serde_json::Value, key: &str) -> Option<Decimal> {
    match args.get(key)? {
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
