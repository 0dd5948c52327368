//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /shop
//! GET  /health                 - Health check
//!
//! # Shop
//! GET  /shop                   - Product listing with cart sidebar
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart items fragment
//! POST /cart/add               - Add product (returns count fragment)
//! POST /cart/remove            - Remove a line (returns cart_items fragment)
//! POST /cart/checkout          - Clear the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Assistant
//! POST /api/chat               - Shopping assistant (JSON)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (merges guest cart)
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action (merges guest cart)
//! POST /auth/logout            - Logout action
//!
//! # Google OAuth
//! GET  /auth/google/login      - Redirect to Google OAuth
//! GET  /auth/google/callback   - Handle OAuth callback (merges guest cart)
//! ```

pub mod auth;
pub mod cart;
pub mod chat;
pub mod google_auth;
pub mod shop;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Google OAuth
        .route("/google/login", get(google_auth::login))
        .route("/google/callback", get(google_auth::callback))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::items))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/shop") }))
        .route("/shop", get(shop::index))
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .route("/api/chat", post(chat::chat))
}
