//! User account queries.

use sqlx::{FromRow, PgPool};

use tidepool_core::{Email, UserId};

use super::RepositoryError;

/// A user row. `password_hash` is `None` for accounts created through
/// Google sign-in.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    /// User's database ID.
    pub id: UserId,
    /// User's email address (stored lowercased).
    pub email: String,
    /// Argon2 password hash, if the account has a password.
    pub password_hash: Option<String>,
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, RepositoryError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email.as_ref())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user with a password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken,
    /// `RepositoryError::Database` on other failures.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<UserRecord, RepositoryError> {
        let result = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash",
        )
        .bind(UserId::random())
        .bind(email.as_ref())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(err) => {
                let repo_err = RepositoryError::from(err);
                if repo_err.is_unique_violation() {
                    Err(RepositoryError::Conflict(format!(
                        "email already registered: {email}"
                    )))
                } else {
                    Err(repo_err)
                }
            }
        }
    }

    /// Find or create a passwordless account for a Google sign-in.
    ///
    /// An existing account with the same email is reused as-is; its
    /// password (if any) is untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn upsert_google_user(&self, email: &Email) -> Result<UserRecord, RepositoryError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email)
             VALUES ($1, $2)
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
             RETURNING id, email, password_hash",
        )
        .bind(UserId::random())
        .bind(email.as_ref())
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }
}
