//! Cart identity resolution.
//!
//! Decides which [`Owner`] a request's cart operations are scoped to:
//! the logged-in user from the session if there is one, otherwise the
//! guest id carried in a long-lived cookie.
//!
//! The two entry points differ in whether they may mint identity:
//! [`current_owner`] is read-only (borrowing the jar, it cannot set
//! cookies), so viewing a cart never creates one; write paths call
//! [`resolve_or_create_owner`], which takes the jar by value and returns
//! it, possibly with a fresh guest cookie added.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_sessions::Session;
use tracing::debug;

use tidepool_core::GuestId;

use crate::models::{CurrentUser, Owner, session_keys};

/// Name of the guest cart cookie.
pub const GUEST_CART_COOKIE: &str = "guest_cart_id";

/// Guest cookie lifetime in days.
const GUEST_COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Resolve the request's cart owner without creating one.
///
/// Returns `None` when there is neither a logged-in user nor a valid
/// guest cookie. A malformed guest cookie is treated as absent.
pub async fn current_owner(session: &Session, jar: &CookieJar) -> Option<Owner> {
    if let Some(user) = session_user(session).await {
        return Some(Owner::User(user.id));
    }

    guest_from_jar(jar).map(Owner::Guest)
}

/// Resolve the request's cart owner, minting a guest identity if needed.
///
/// Returns the owner and the jar to send back; the jar gains a guest
/// cookie only when a new guest was minted.
pub async fn resolve_or_create_owner(session: &Session, jar: CookieJar) -> (Owner, CookieJar) {
    if let Some(user) = session_user(session).await {
        return (Owner::User(user.id), jar);
    }

    if let Some(guest) = guest_from_jar(&jar) {
        return (Owner::Guest(guest), jar);
    }

    let guest = GuestId::random();
    debug!(%guest, "minted guest cart identity");
    (Owner::Guest(guest), jar.add(guest_cookie(guest)))
}

/// Remove the guest cookie, after a successful merge into a user cart.
///
/// The removal cookie must repeat the `Path` the cookie was issued under;
/// a bare removal would scope to the requesting path (e.g. `/auth`) and
/// browsers would keep the original site-wide cookie.
#[must_use]
pub fn clear_guest_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((GUEST_CART_COOKIE, "")).path("/").build())
}

/// The guest id from the jar, if present and well-formed.
#[must_use]
pub fn guest_from_jar(jar: &CookieJar) -> Option<GuestId> {
    jar.get(GUEST_CART_COOKIE)
        .and_then(|cookie| GuestId::parse(cookie.value()).ok())
}

async fn session_user(session: &Session) -> Option<CurrentUser> {
    // Session store failures degrade to anonymous rather than erroring.
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

fn guest_cookie(guest: GuestId) -> Cookie<'static> {
    Cookie::build((GUEST_CART_COOKIE, guest.to_string()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(tower_sessions::cookie::time::Duration::days(
            GUEST_COOKIE_MAX_AGE_DAYS,
        ))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_from_jar_parses_valid_cookie() {
        let id = GuestId::random();
        let jar = CookieJar::new().add(Cookie::new(GUEST_CART_COOKIE, id.to_string()));
        assert_eq!(guest_from_jar(&jar), Some(id));
    }

    #[test]
    fn test_guest_from_jar_ignores_garbage() {
        let jar = CookieJar::new().add(Cookie::new(GUEST_CART_COOKIE, "not-a-uuid"));
        assert_eq!(guest_from_jar(&jar), None);
    }

    #[test]
    fn test_guest_from_jar_empty() {
        assert_eq!(guest_from_jar(&CookieJar::new()), None);
    }

    #[test]
    fn test_guest_cookie_attributes() {
        let cookie = guest_cookie(GuestId::random());
        assert_eq!(cookie.name(), GUEST_CART_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(
            cookie.max_age(),
            Some(tower_sessions::cookie::time::Duration::days(30))
        );
    }

    #[test]
    fn test_clear_guest_cookie_removal_is_site_wide() {
        use axum::response::IntoResponse;

        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            format!("{GUEST_CART_COOKIE}={}", GuestId::random())
                .parse()
                .expect("valid header value"),
        );
        let jar = CookieJar::from_headers(&headers);
        let response = clear_guest_cookie(jar).into_response();

        let removal = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .expect("removal cookie must be set");

        assert!(removal.starts_with(&format!("{GUEST_CART_COOKIE}=")));
        // The deletion only reaches the stored cookie if it repeats Path=/.
        assert!(removal.contains("Path=/"));
        assert!(removal.contains("Max-Age=0"));
    }
}
