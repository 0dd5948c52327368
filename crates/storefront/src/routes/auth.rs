//! Email/password authentication route handlers.
//!
//! Failures redirect back to the form with an `?error=` code rather than
//! rendering an error page, so the form keeps its URL. On any successful
//! sign-in the guest cart (if one exists) is merged into the user's cart;
//! a failed merge is logged and the guest cookie kept so the lines survive
//! for a later attempt, and the sign-in itself still succeeds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tidepool_core::UserId;

use crate::db::CartRepository;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::middleware::identity::{clear_guest_cookie, guest_from_jar};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

/// Error code carried in the `?error=` query parameter.
#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<&'static str>,
}

/// Map an error code from the query string to a display message.
fn error_message(code: &str) -> &'static str {
    match code {
        "invalid" => "Invalid email or password",
        "email_taken" => "An account with this email already exists",
        "weak_password" => "Password must be at least 8 characters",
        "invalid_email" => "That email address doesn't look right",
        "google" => "Google sign-in failed, please try again",
        _ => "Something went wrong, please try again",
    }
}

/// Display the login page.
///
/// # Route
///
/// `GET /auth/login`
pub async fn login_page(Query(query): Query<ErrorQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Display the registration page.
///
/// # Route
///
/// `GET /auth/register`
pub async fn register_page(Query(query): Query<ErrorQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle a login submission.
///
/// # Route
///
/// `POST /auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            return Redirect::to("/auth/login?error=invalid").into_response();
        }
    };

    finish_sign_in(&state, &session, jar, user, "/auth/login").await
}

/// Handle a registration submission.
///
/// # Route
///
/// `POST /auth/register`
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let user = match AuthService::new(state.pool())
        .register(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            let code = match &e {
                AuthError::EmailTaken => "email_taken",
                AuthError::WeakPassword(_) => "weak_password",
                AuthError::InvalidEmail(_) => "invalid_email",
                _ => "server",
            };
            tracing::warn!("Registration failed: {e}");
            return Redirect::to(&format!("/auth/register?error={code}")).into_response();
        }
    };

    finish_sign_in(&state, &session, jar, user, "/auth/register").await
}

/// Handle a logout submission.
///
/// The guest cookie (if any) is untouched; it belongs to whoever uses the
/// browser next, not to the user signing out.
///
/// # Route
///
/// `POST /auth/logout`
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session on logout: {e}");
    }
    clear_sentry_user();

    Redirect::to("/shop").into_response()
}

/// Store the session identity, merge any guest cart, and redirect to the
/// shop. Shared by password and Google sign-in.
pub(crate) async fn finish_sign_in(
    state: &AppState,
    session: &Session,
    jar: CookieJar,
    user: crate::models::CurrentUser,
    failure_path: &str,
) -> Response {
    if let Err(e) = set_current_user(session, &user).await {
        tracing::error!("Failed to store user in session: {e}");
        return Redirect::to(&format!("{failure_path}?error=session")).into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_ref()));

    let jar = merge_guest_cart(state, user.id, jar).await;

    (jar, Redirect::to("/shop")).into_response()
}

/// Merge the guest cart named by the jar's cookie into `user_id`'s cart.
///
/// On success the guest cookie is removed; on failure it is kept so the
/// guest lines remain reachable and a later sign-in can retry.
pub(crate) async fn merge_guest_cart(state: &AppState, user_id: UserId, jar: CookieJar) -> CookieJar {
    let Some(guest) = guest_from_jar(&jar) else {
        return jar;
    };

    match CartRepository::new(state.pool())
        .merge_guest_into_user(guest, user_id)
        .await
    {
        Ok(moved) => {
            tracing::info!("Merged {moved} guest cart lines into user {user_id}");
            clear_guest_cookie(jar)
        }
        Err(e) => {
            tracing::error!("Failed to merge guest cart {guest}: {e}");
            jar
        }
    }
}
