//! Cart line type.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use tidepool_core::{CartLineId, ProductId};

/// One line in a cart, joined with its product for display.
///
/// Quantity is fixed at 1 per add; repeated adds of the same product insert
/// separate lines (matching upstream behavior, see DESIGN.md).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
    /// Cart row id (used for removal).
    pub id: CartLineId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Unit price at display time.
    pub price: Decimal,
    /// Product category.
    pub category: String,
    /// Product image URL.
    pub image_url: String,
    /// Line quantity.
    pub quantity: i32,
}

impl CartLine {
    /// Total for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
