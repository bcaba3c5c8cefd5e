//! Order repository.
//!
//! Orders only ever reference immutable addresses; the row is written in
//! the same transaction that froze them.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use quitanda_core::{ImmutableAddressId, OrderId, UserId};

use super::RepositoryError;
use crate::models::order::Order;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    billing_address_id: ImmutableAddressId,
    shipping_address_id: ImmutableAddressId,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            billing_address_id: self.billing_address_id,
            shipping_address_id: self.shipping_address_id,
            created_at: self.created_at,
        }
    }
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        billing: ImmutableAddressId,
        shipping: ImmutableAddressId,
    ) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO brazil.checkout_order
                (user_id, billing_address_id, shipping_address_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, billing_address_id, shipping_address_id, created_at
            ",
        )
        .bind(user_id)
        .bind(billing)
        .bind(shipping)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into_order())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, billing_address_id, shipping_address_id, created_at
            FROM brazil.checkout_order
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(OrderRow::into_order))
    }
}
