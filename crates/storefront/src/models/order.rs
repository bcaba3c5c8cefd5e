//! Order domain type.
//!
//! The add-on records which frozen addresses an order was confirmed with;
//! line items, payment and fulfillment stay with the host storefront.

use chrono::{DateTime, Utc};

use quitanda_core::{ImmutableAddressId, OrderId, UserId};

/// A confirmed order, referencing immutable addresses only.
#[derive(Debug, Clone)]
pub struct Order {
    /// Database ID of this order.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Frozen billing address.
    pub billing_address_id: ImmutableAddressId,
    /// Frozen shipping address.
    pub shipping_address_id: ImmutableAddressId,
    /// When the order was confirmed.
    pub created_at: DateTime<Utc>,
}
