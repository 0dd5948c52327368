//! Integration tests for Tidepool.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations + seed
//! cargo run -p tidepool-cli -- migrate
//! cargo run -p tidepool-cli -- seed
//!
//! # Start the storefront
//! cargo run -p tidepool-storefront
//!
//! # Run integration tests (they are #[ignore]d by default)
//! cargo test -p tidepool-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running storefront over HTTP; nothing is mocked.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A fresh HTTP client with its own cookie jar, i.e. a new "browser".
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn new_browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Like [`new_browser`], but redirects are not followed, so tests can
/// assert on the `Set-Cookie` and `Location` headers of 303 responses.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn new_browser_no_redirect() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
