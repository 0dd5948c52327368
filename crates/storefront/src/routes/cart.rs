//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every handler resolves the cart's owner first; read paths never mint a
//! guest identity, write paths may.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tidepool_core::{CartLineId, ProductId};

use crate::db::CartRepository;
use crate::filters::{self, format_money};
use crate::middleware::{current_owner, resolve_or_create_owner};
use crate::models::{CartLine, Owner};
use crate::state::AppState;

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: String,
    pub line_count: usize,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: format_money(Decimal::ZERO),
            line_count: 0,
        }
    }

    fn from_lines(lines: Vec<CartLine>) -> Self {
        let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
        Self {
            subtotal: format_money(subtotal),
            line_count: lines.len(),
            lines,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: i64,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: i64,
}

/// Load the owner's cart for display, degrading to empty on failure.
pub(crate) async fn load_cart(state: &AppState, owner: Option<Owner>) -> CartView {
    let Some(owner) = owner else {
        return CartView::empty();
    };

    match CartRepository::new(state.pool()).lines_for(owner).await {
        Ok(lines) => CartView::from_lines(lines),
        Err(e) => {
            tracing::warn!("Failed to load cart for {owner}: {e}");
            CartView::empty()
        }
    }
}

/// Cart items fragment (HTMX).
#[instrument(skip(state, session, jar))]
pub async fn items(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> impl IntoResponse {
    let owner = current_owner(&session, &jar).await;
    CartItemsTemplate {
        cart: load_cart(&state, owner).await,
    }
}

/// Add a product to the cart (HTMX).
///
/// Mints a guest identity (and sets its cookie) when the request has
/// neither a user nor a guest. A failed insert is logged and the current
/// count returned anyway, so one bad click never breaks the page.
#[instrument(skip(state, session, jar))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let (owner, jar) = resolve_or_create_owner(&session, jar).await;

    let repo = CartRepository::new(state.pool());

    if let Err(e) = repo.add_line(owner, ProductId::new(form.product_id)).await {
        tracing::error!("Failed to add product {} to cart: {e}", form.product_id);
    }

    let count = repo.count_for(owner).await.unwrap_or(0);

    (
        jar,
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Remove a line from the cart (HTMX).
///
/// Only removes lines the requester owns; a stale or foreign line id is
/// logged and ignored.
#[instrument(skip(state, session, jar))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(owner) = current_owner(&session, &jar).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let repo = CartRepository::new(state.pool());

    if let Err(e) = repo.remove_line(owner, CartLineId::new(form.line_id)).await {
        tracing::warn!("Failed to remove cart line {}: {e}", form.line_id);
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: load_cart(&state, Some(owner)).await,
        },
    )
        .into_response()
}

/// Check out: clear all of the owner's lines (HTMX).
///
/// There is no payment step; checkout empties the cart. Checking out an
/// empty cart is a no-op.
#[instrument(skip(state, session, jar))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Response {
    if let Some(owner) = current_owner(&session, &jar).await {
        match CartRepository::new(state.pool()).clear(owner).await {
            Ok(removed) => tracing::info!("Checkout cleared {removed} lines for {owner}"),
            Err(e) => tracing::error!("Failed to clear cart for {owner}: {e}"),
        }
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::empty(),
        },
    )
        .into_response()
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session, jar))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> impl IntoResponse {
    let count = match current_owner(&session, &jar).await {
        Some(owner) => CartRepository::new(state.pool())
            .count_for(owner)
            .await
            .unwrap_or(0),
        None => 0,
    };

    CartCountTemplate { count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_core::ProductId;

    fn line(price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            id: CartLineId::new(1),
            product_id: ProductId::new(1),
            product_name: "Test".to_string(),
            price,
            category: "Electronics".to_string(),
            image_url: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_cart_view_subtotal() {
        let view = CartView::from_lines(vec![
            line(Decimal::new(1050, 2), 1),
            line(Decimal::new(200, 2), 2),
        ]);
        assert_eq!(view.subtotal, "$14.50");
        assert_eq!(view.line_count, 2);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.line_count, 0);
        assert!(view.lines.is_empty());
    }
}
