//! Account registration and sign-in.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::instrument;

use tidepool_core::{Email, EmailError};

use crate::db::{RepositoryError, UserRecord, UserRepository};
use crate::models::CurrentUser;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from registration and sign-in.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password failed validation.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// An account with this email already exists.
    #[error("email already registered")]
    EmailTaken,

    /// Wrong email or password. Deliberately does not distinguish which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::EmailTaken,
            other => Self::Repository(other),
        }
    }
}

/// Service for account registration and sign-in.
pub struct AuthService<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account with an email and password.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid email, weak password, taken email, or
    /// database failure.
    #[instrument(skip_all)]
    pub async fn register(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let hash = hash_password(password)?;

        let user = UserRepository::new(self.pool)
            .create_with_password(&email, &hash)
            .await?;

        current_user(user)
    }

    /// Sign in with an email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, a
    /// passwordless (Google-only) account, or a wrong password.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = UserRepository::new(self.pool)
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, hash)?;

        current_user(user)
    }

    /// Sign in (or register) via a verified Google identity.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    #[instrument(skip_all)]
    pub async fn login_google(&self, email: &Email) -> Result<CurrentUser, AuthError> {
        let user = UserRepository::new(self.pool).upsert_google_user(email).await?;
        current_user(user)
    }
}

/// Build the session identity from a user row.
///
/// Emails pass validation at write time, so a row that no longer parses is
/// corrupt data.
fn current_user(user: UserRecord) -> Result<CurrentUser, AuthError> {
    let email = Email::parse(&user.email).map_err(|err| {
        AuthError::Repository(RepositoryError::DataCorruption(format!(
            "user {} has invalid email: {err}",
            user.id
        )))
    })?;

    Ok(CurrentUser { id: user.id, email })
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").expect("hash");
        let b = hash_password("same password").expect("hash");
        assert_ne!(a, b);
    }
}
