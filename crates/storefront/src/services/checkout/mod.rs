//! Checkout confirmation service.
//!
//! At order confirmation the customer's editable addresses are frozen into
//! immutable copies (with their Brazilian extra-field snapshots) and the
//! order row is written, all inside one transaction. After this point the
//! order's addresses never change, whatever the customer later does to the
//! mutable originals.

mod error;

pub use error::CheckoutError;

use sqlx::PgPool;

use quitanda_core::{ImmutableAddressId, MutableAddressId, UserId};

use crate::db::{AddressRepository, OrderRepository, RepositoryError};
use crate::models::order::Order;

/// Checkout confirmation service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

/// Outcome of a confirmed checkout.
#[derive(Debug, Clone)]
pub struct ConfirmedOrder {
    /// The created order row.
    pub order: Order,
    /// Frozen billing address.
    pub billing_address_id: ImmutableAddressId,
    /// Frozen shipping address.
    pub shipping_address_id: ImmutableAddressId,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Confirm an order: freeze the billing and shipping addresses and
    /// create the order row.
    ///
    /// The whole operation is one transaction; either both frozen
    /// addresses (with their extra snapshots) and the order exist, or
    /// nothing was written. When billing and shipping are the same
    /// mutable address it is frozen once and shared.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AddressNotFound` if either address doesn't
    /// exist, or a repository error.
    pub async fn confirm(
        &self,
        user_id: UserId,
        billing: MutableAddressId,
        shipping: MutableAddressId,
    ) -> Result<ConfirmedOrder, CheckoutError> {
        let addresses = AddressRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let billing_frozen = addresses
            .freeze(&mut tx, billing)
            .await
            .map_err(map_not_found)?;
        let shipping_frozen = if shipping == billing {
            billing_frozen
        } else {
            addresses
                .freeze(&mut tx, shipping)
                .await
                .map_err(map_not_found)?
        };

        let order = orders
            .create(&mut tx, user_id, billing_frozen, shipping_frozen)
            .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            "order confirmed, addresses frozen"
        );
        Ok(ConfirmedOrder {
            order,
            billing_address_id: billing_frozen,
            shipping_address_id: shipping_frozen,
        })
    }
}

fn map_not_found(e: RepositoryError) -> CheckoutError {
    match e {
        RepositoryError::NotFound => CheckoutError::AddressNotFound,
        other => CheckoutError::Repository(other),
    }
}
