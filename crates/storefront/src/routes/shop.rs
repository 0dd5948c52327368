//! Shop page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::filters;
use crate::middleware::{OptionalAuth, current_owner};
use crate::models::{CurrentUser, Product};
use crate::routes::cart::{CartView, load_cart};
use crate::state::AppState;

/// Shop page template: the catalog grid with the cart sidebar.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub products: Vec<Product>,
    pub cart: CartView,
    pub user: Option<CurrentUser>,
}

/// Display the shop page.
///
/// Viewing the shop never mints a cart identity; an anonymous visitor with
/// no guest cookie just sees an empty cart.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    let products = match ProductRepository::new(state.pool()).list_all().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!("Failed to load catalog: {e}");
            Vec::new()
        }
    };

    let owner = current_owner(&session, &jar).await;
    let cart = load_cart(&state, owner).await;

    ShopTemplate {
        products,
        cart,
        user,
    }
}
