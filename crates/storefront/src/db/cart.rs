//! Cart persistence.
//!
//! Every query here is scoped by [`Owner`]: a row belongs to exactly one of
//! `user_id` or `guest_id` (enforced by a table CHECK), and no statement
//! ever touches rows outside the caller's owner. Merge is the single
//! exception, and it is one atomic UPDATE that rewrites ownership rather
//! than copying rows.

use sqlx::PgPool;

use tidepool_core::{CartLineId, ProductId, UserId};

use crate::models::{CartLine, Owner};

use super::RepositoryError;

/// Repository for cart lines.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the owner's cart lines joined with product data, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn lines_for(&self, owner: Owner) -> Result<Vec<CartLine>, RepositoryError> {
        let sql = format!(
            "SELECT ci.id, ci.product_id, p.product_name, p.price, p.category,
                    p.image_url, ci.quantity
             FROM cart_items ci
             JOIN product p ON p.id = ci.product_id
             WHERE ci.{} = $1
             ORDER BY ci.created_at ASC, ci.id ASC",
            owner_column(owner),
        );

        let lines = sqlx::query_as::<_, CartLine>(&sql)
            .bind(owner_uuid(owner))
            .fetch_all(self.pool)
            .await?;

        Ok(lines)
    }

    /// Count the owner's cart lines (for the header badge).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn count_for(&self, owner: Owner) -> Result<i64, RepositoryError> {
        let sql = format!(
            "SELECT COUNT(*) FROM cart_items WHERE {} = $1",
            owner_column(owner),
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(owner_uuid(owner))
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Insert a new line for the owner.
    ///
    /// Each add inserts a fresh row with quantity 1; adding the same
    /// product twice yields two lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on insert failure, including
    /// foreign-key violations for unknown products.
    pub async fn add_line(
        &self,
        owner: Owner,
        product_id: ProductId,
    ) -> Result<CartLineId, RepositoryError> {
        let sql = format!(
            "INSERT INTO cart_items (product_id, {}) VALUES ($1, $2) RETURNING id",
            owner_column(owner),
        );

        let id: CartLineId = sqlx::query_scalar(&sql)
            .bind(product_id)
            .bind(owner_uuid(owner))
            .fetch_one(self.pool)
            .await?;

        Ok(id)
    }

    /// Delete one line, but only if it belongs to the owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched (wrong owner
    /// or already removed).
    pub async fn remove_line(
        &self,
        owner: Owner,
        line_id: CartLineId,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "DELETE FROM cart_items WHERE id = $1 AND {} = $2",
            owner_column(owner),
        );

        let result = sqlx::query(&sql)
            .bind(line_id)
            .bind(owner_uuid(owner))
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete all of the owner's lines. Returns the number of lines
    /// removed; clearing an empty cart is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn clear(&self, owner: Owner) -> Result<u64, RepositoryError> {
        let sql = format!(
            "DELETE FROM cart_items WHERE {} = $1",
            owner_column(owner),
        );

        let result = sqlx::query(&sql)
            .bind(owner_uuid(owner))
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Reassign every line owned by `guest` to `user`.
    ///
    /// A single UPDATE, so the merge is atomic: either all guest lines move
    /// or none do. Merging a guest with no lines is a no-op. Returns the
    /// number of lines moved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn merge_guest_into_user(
        &self,
        guest: tidepool_core::GuestId,
        user: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items
             SET user_id = $2, guest_id = NULL
             WHERE guest_id = $1",
        )
        .bind(guest)
        .bind(user)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Column a given owner's rows are keyed by.
const fn owner_column(owner: Owner) -> &'static str {
    match owner {
        Owner::User(_) => "user_id",
        Owner::Guest(_) => "guest_id",
    }
}

/// The owner's raw UUID for binding.
fn owner_uuid(owner: Owner) -> uuid::Uuid {
    match owner {
        Owner::User(id) => id.as_uuid(),
        Owner::Guest(id) => id.as_uuid(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_core::GuestId;

    #[test]
    fn test_owner_column_selection() {
        assert_eq!(owner_column(Owner::User(UserId::random())), "user_id");
        assert_eq!(owner_column(Owner::Guest(GuestId::random())), "guest_id");
    }

    #[test]
    fn test_owner_uuid_passthrough() {
        let user = UserId::random();
        assert_eq!(owner_uuid(Owner::User(user)), user.as_uuid());
        let guest = GuestId::random();
        assert_eq!(owner_uuid(Owner::Guest(guest)), guest.as_uuid());
    }
}
