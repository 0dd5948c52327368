//! Google OAuth route handlers.
//!
//! Handles the OAuth flow for Google sign-in:
//! - Login: Redirects to Google's OAuth authorization page
//! - Callback: Validates state, exchanges the code, reads the verified
//!   email, and signs the user in (merging any guest cart)

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use rand::Rng;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use tidepool_core::Email;

use crate::config::GoogleOauthConfig;
use crate::models::session_keys;
use crate::services::AuthService;
use crate::state::AppState;

use super::auth::finish_sign_in;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Token response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Userinfo response from Google's OpenID endpoint.
#[derive(Debug, Deserialize)]
struct UserInfo {
    email: String,
    #[serde(default)]
    email_verified: bool,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            char::from(CHARSET[idx])
        })
        .collect()
}

fn redirect_uri(state: &AppState) -> String {
    format!("{}/auth/google/callback", state.config().base_url)
}

/// Initiate Google OAuth login.
///
/// Generates a state parameter, stores it in the session, and redirects
/// to Google's authorization page.
///
/// # Route
///
/// `GET /auth/google/login`
#[instrument(skip_all)]
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let Some(google) = state.config().google_oauth.as_ref() else {
        tracing::warn!("Google OAuth is not configured");
        return Redirect::to("/auth/login?error=google").into_response();
    };

    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::GOOGLE_OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    let auth_url = authorization_url(google, &redirect_uri(&state), &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Build Google's authorization URL.
fn authorization_url(google: &GoogleOauthConfig, redirect_uri: &str, oauth_state: &str) -> String {
    let mut url = Url::parse(GOOGLE_AUTH_URL).expect("constant URL must parse");

    url.query_pairs_mut()
        .append_pair("client_id", &google.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", "openid email")
        .append_pair("state", oauth_state);

    url.into()
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code, reads
/// the verified email, and signs the user in. Any guest cart is merged as
/// part of sign-in.
///
/// # Route
///
/// `GET /auth/google/callback`
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(google) = state.config().google_oauth.as_ref() else {
        return Redirect::to("/auth/login?error=google").into_response();
    };

    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {error}");
        return Redirect::to("/auth/login?error=google").into_response();
    }

    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return Redirect::to("/auth/login?error=google").into_response();
    };

    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return Redirect::to("/auth/login?error=google").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::GOOGLE_OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return Redirect::to("/auth/login?error=google").into_response();
    }

    // One-time use
    let _ = session.remove::<String>(session_keys::GOOGLE_OAUTH_STATE).await;

    let email = match fetch_verified_email(google, &redirect_uri(&state), &code).await {
        Ok(email) => email,
        Err(e) => {
            tracing::error!("Google OAuth exchange failed: {e}");
            return Redirect::to("/auth/login?error=google").into_response();
        }
    };

    let user = match AuthService::new(state.pool()).login_google(&email).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Google sign-in failed: {e}");
            return Redirect::to("/auth/login?error=server").into_response();
        }
    };

    tracing::info!("Google sign-in succeeded for user {}", user.id);

    finish_sign_in(&state, &session, jar, user, "/auth/login").await
}

/// Exchange the authorization code and return the account's verified email.
async fn fetch_verified_email(
    google: &GoogleOauthConfig,
    redirect_uri: &str,
    code: &str,
) -> Result<Email, GoogleOauthError> {
    let client = reqwest::Client::new();

    let token: TokenResponse = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", &google.client_id),
            ("client_secret", google.client_secret.expose_secret()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let info: UserInfo = client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if !info.email_verified {
        return Err(GoogleOauthError::UnverifiedEmail);
    }

    Email::parse(&info.email).map_err(|e| GoogleOauthError::InvalidEmail(e.to_string()))
}

/// Errors from the Google OAuth exchange.
#[derive(Debug, thiserror::Error)]
enum GoogleOauthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Google account email is not verified")]
    UnverifiedEmail,
    #[error("invalid email from Google: {0}")]
    InvalidEmail(String),
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(char::is_alphanumeric));
    }

    #[test]
    fn test_authorization_url() {
        let google = GoogleOauthConfig {
            client_id: "client-123".to_string(),
            client_secret: SecretString::from("secret"),
        };
        let url = authorization_url(&google, "https://shop.example/auth/google/callback", "st4te");
        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=st4te"));
        assert!(url.contains("scope=openid+email") || url.contains("scope=openid%20email"));
    }
}
