//! odk-schemas
//!
//! Flat serde data shapes shared across the workspace. This crate sits at the
//! bottom of the dependency graph and holds no behavior: order status travels
//! as a plain `String` here, and the typed lifecycle machinery in `odk-orders`
//! owns parsing and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One (product, quantity) line of an order, frozen at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    pub product_id: String,
    pub quantity: u32,
}

/// Serialized form of a single order, as written to ledger files and printed
/// on the CLI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// One of: Confirmed, Shipped, Cancelled, Receipted, Returned.
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub receipt_date: Option<DateTime<Utc>>,
    pub shipping_address: String,
    pub items: Vec<OrderItemSnapshot>,
}

/// Creation request for a new order: everything the customer supplies.
/// The id, status, and order date are assigned by the order directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: Uuid,
    pub shipping_address: String,
    pub items: Vec<OrderItemSnapshot>,
}
