//! Integration tests for cart ownership, merge-on-login, and checkout.
//!
//! Requires a running storefront (`cargo run -p tidepool-storefront`) with a
//! migrated, seeded database. Run with `cargo test -- --ignored`.

use tidepool_integration_tests::{new_browser, new_browser_no_redirect, storefront_base_url};
use uuid::Uuid;

const GUEST_COOKIE: &str = "guest_cart_id";

/// Whether any `Set-Cookie` header on the response names the guest cookie.
fn sets_guest_cookie(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(GUEST_COOKIE))
}

/// Whether any `Set-Cookie` header clears the guest cookie: empty value or
/// immediate expiry, and scoped to `Path=/` so the browser actually deletes
/// the site-wide cookie rather than a path-local shadow.
fn clears_guest_cookie(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase())
        .any(|value| {
            value.starts_with(GUEST_COOKIE)
                && (value.starts_with(&format!("{GUEST_COOKIE}=;")) || value.contains("max-age=0"))
                && value.contains("path=/")
        })
}

/// First product id visible on the shop page.
///
/// The product grid posts each product's id through a hidden form field, so
/// the rendered page always contains at least one `name="product_id"
/// value="..."` pair when the catalog is seeded.
async fn first_product_id(client: &reqwest::Client) -> i64 {
    let body = client
        .get(format!("{}/shop", storefront_base_url()))
        .send()
        .await
        .expect("Failed to load shop page")
        .text()
        .await
        .expect("Failed to read shop page");

    let marker = "name=\"product_id\" value=\"";
    let start = body.find(marker).expect("No products on shop page") + marker.len();
    let end = start + body[start..].find('"').expect("Unterminated product id");

    body[start..end].parse().expect("Product id is not a number")
}

async fn add_to_cart(client: &reqwest::Client, product_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/cart/add", storefront_base_url()))
        .form(&[("product_id", product_id.to_string())])
        .send()
        .await
        .expect("Failed to add to cart")
}

async fn cart_count(client: &reqwest::Client) -> String {
    client
        .get(format!("{}/cart/count", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch cart count")
        .text()
        .await
        .expect("Failed to read cart count")
        .trim()
        .to_string()
}

async fn register(client: &reqwest::Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/register", storefront_base_url()))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to register")
}

// ===== Guest Identity Tests =====

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_browsing_does_not_mint_guest_identity() {
    let client = new_browser();

    let shop = client
        .get(format!("{}/shop", storefront_base_url()))
        .send()
        .await
        .expect("Failed to load shop page");
    assert!(shop.status().is_success());
    assert!(!sets_guest_cookie(&shop), "viewing the shop set a guest cookie");

    let cart = client
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to load cart fragment");
    assert!(cart.status().is_success());
    assert!(!sets_guest_cookie(&cart), "viewing the cart set a guest cookie");

    assert_eq!(cart_count(&client).await, "0");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_add_to_cart_mints_guest_identity_once() {
    let client = new_browser();
    let product_id = first_product_id(&client).await;

    let first = add_to_cart(&client, product_id).await;
    assert!(first.status().is_success());
    assert!(sets_guest_cookie(&first), "first add did not set the guest cookie");

    // Second add reuses the cookie already in the jar.
    let second = add_to_cart(&client, product_id).await;
    assert!(second.status().is_success());
    assert!(!sets_guest_cookie(&second), "second add re-minted the guest cookie");

    assert_eq!(cart_count(&client).await, "2");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_guest_carts_are_isolated() {
    let alice = new_browser();
    let bob = new_browser();
    let product_id = first_product_id(&alice).await;

    add_to_cart(&alice, product_id).await;

    assert_eq!(cart_count(&alice).await, "1");
    assert_eq!(cart_count(&bob).await, "0");
}

// ===== Cart Mutation Tests =====

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cart_fragment_lists_added_line() {
    let client = new_browser();
    let product_id = first_product_id(&client).await;

    add_to_cart(&client, product_id).await;

    let body = client
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to load cart fragment")
        .text()
        .await
        .expect("Failed to read cart fragment");

    assert!(body.contains("line_id"), "cart fragment has no remove form");
    assert!(!body.contains("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_remove_ignores_foreign_line() {
    let client = new_browser();
    let product_id = first_product_id(&client).await;
    add_to_cart(&client, product_id).await;

    // A line id this owner does not hold. The handler logs and returns the
    // unchanged cart rather than failing.
    let response = client
        .post(format!("{}/cart/remove", storefront_base_url()))
        .form(&[("line_id", "999999999")])
        .send()
        .await
        .expect("Failed to post remove");

    assert!(response.status().is_success());
    assert_eq!(cart_count(&client).await, "1");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_clears_cart_and_is_idempotent() {
    let client = new_browser();
    let product_id = first_product_id(&client).await;
    add_to_cart(&client, product_id).await;
    add_to_cart(&client, product_id).await;

    let checkout = client
        .post(format!("{}/cart/checkout", storefront_base_url()))
        .send()
        .await
        .expect("Failed to checkout");
    assert!(checkout.status().is_success());
    assert_eq!(cart_count(&client).await, "0");

    // Checking out an empty cart succeeds quietly.
    let again = client
        .post(format!("{}/cart/checkout", storefront_base_url()))
        .send()
        .await
        .expect("Failed to checkout");
    assert!(again.status().is_success());
}

// ===== Merge-on-Login Tests =====

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_register_merges_guest_cart() {
    // No redirect-following so the register response itself is inspectable.
    let client = new_browser_no_redirect();
    let product_id = first_product_id(&client).await;
    add_to_cart(&client, product_id).await;
    assert_eq!(cart_count(&client).await, "1");

    let email = format!("merge-{}@example.com", Uuid::new_v4());
    let response = register(&client, &email, "correct horse battery").await;
    assert!(response.status().is_redirection());
    assert!(clears_guest_cookie(&response), "register did not clear the guest cookie");

    // The merged line now belongs to the signed-in user.
    assert_eq!(cart_count(&client).await, "1");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_login_merges_guest_cart_into_existing_account() {
    let email = format!("returning-{}@example.com", Uuid::new_v4());
    let password = "correct horse battery";

    // Create the account, give it one line, and sign out.
    let first_visit = new_browser();
    let product_id = first_product_id(&first_visit).await;
    add_to_cart(&first_visit, product_id).await;
    register(&first_visit, &email, password).await;
    first_visit
        .post(format!("{}/auth/logout", storefront_base_url()))
        .send()
        .await
        .expect("Failed to log out");

    // A later guest session adds another line and signs in.
    let second_visit = new_browser();
    add_to_cart(&second_visit, product_id).await;

    let login = second_visit
        .post(format!("{}/auth/login", storefront_base_url()))
        .form(&[("email", email.as_str()), ("password", password)])
        .send()
        .await
        .expect("Failed to log in");
    assert!(login.status().is_success());

    assert_eq!(cart_count(&second_visit).await, "2");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_logout_leaves_guest_cookie_alone() {
    let email = format!("logout-{}@example.com", Uuid::new_v4());

    let client = new_browser_no_redirect();
    register(&client, &email, "correct horse battery").await;

    let logout = client
        .post(format!("{}/auth/logout", storefront_base_url()))
        .send()
        .await
        .expect("Failed to log out");

    assert!(logout.status().is_redirection());
    assert!(!sets_guest_cookie(&logout));
    assert!(!clears_guest_cookie(&logout));
}

// ===== Auth Error Tests =====

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_login_with_bad_credentials_redirects_with_error() {
    let client = new_browser();
    let email = format!("nobody-{}@example.com", Uuid::new_v4());

    let response = client
        .post(format!("{}/auth/login", storefront_base_url()))
        .form(&[("email", email.as_str()), ("password", "wrong password")])
        .send()
        .await
        .expect("Failed to post login");

    // Redirect lands back on the login page with the error banner.
    assert!(response.status().is_success());
    assert!(response.url().query().is_some_and(|q| q.contains("error=")));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_register_rejects_short_password() {
    let client = new_browser();
    let email = format!("short-{}@example.com", Uuid::new_v4());

    let response = register(&client, &email, "short").await;

    assert!(response.status().is_success());
    assert!(response.url().query().is_some_and(|q| q.contains("error=")));
    assert_eq!(cart_count(&client).await, "0");
}
