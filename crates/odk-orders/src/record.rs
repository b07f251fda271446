//! Order aggregate — owns the invariant-checking boundary.
//!
//! # Purpose
//! [`lifecycle`](crate::lifecycle) holds the raw transition rules. This module
//! wraps a single order behind a typed [`OrderRecord`] façade that:
//!
//! - Enforces creation invariants (non-empty shipping address, at least one
//!   item, positive quantities, no duplicate products).
//! - Makes [`OrderRecord::change_status`] the only path that assigns the
//!   status field; nothing else in the workspace can write it.
//! - Locks the shipping address once the order leaves `Confirmed`.
//! - Keeps the item snapshots, customer id, and order date immutable.
//!
//! `receipt_date` is carried and serialized but never written here: stamping
//! it on receipt is caller-side policy and today no caller does so.
//!
//! # Determinism
//! `OrderRecord` takes its id and clock as arguments and is otherwise pure —
//! no IO, no time, no randomness.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::lifecycle::{classify_transition, OrderStatus, TransitionRejected, UnknownStatus};
use odk_schemas::{OrderItemSnapshot, OrderSnapshot};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Creation / mutation invariant violations an [`OrderRecord`] can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Shipping address must be non-empty at creation.
    EmptyShippingAddress,
    /// An order must snapshot at least one item.
    NoItems,
    /// Every item quantity must be strictly positive.
    ZeroQuantity { product_id: String },
    /// The same product may appear at most once per order.
    DuplicateProduct { product_id: String },
    /// The shipping address is only mutable while the order is `Confirmed`.
    AddressLocked { status: OrderStatus },
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyShippingAddress => {
                f.write_str("order invariant: shipping address must not be empty")
            }
            Self::NoItems => f.write_str("order invariant: order must contain at least one item"),
            Self::ZeroQuantity { product_id } => write!(
                f,
                "order invariant: quantity for product {product_id} must be > 0"
            ),
            Self::DuplicateProduct { product_id } => {
                write!(f, "Invalid duplicate Products with Id:{product_id}")
            }
            Self::AddressLocked { status } => {
                write!(f, "Order is already {status} can't change the shipping address")
            }
        }
    }
}

impl std::error::Error for OrderError {}

// ---------------------------------------------------------------------------
// OrderRecord
// ---------------------------------------------------------------------------

/// One purchase transaction, tracked from confirmation to its terminal status.
///
/// Fields are private so every mutation funnels through the two guarded
/// methods; reads go through the accessor methods or [`OrderRecord::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    id: Uuid,
    customer_id: Uuid,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    receipt_date: Option<DateTime<Utc>>,
    shipping_address: String,
    items: Vec<OrderItemSnapshot>,
}

impl OrderRecord {
    /// Create a new order in the `Confirmed` status.
    ///
    /// Items are sorted by product id and the sorted list is checked for
    /// adjacent duplicates, so the stored snapshot order is deterministic
    /// regardless of input order.
    ///
    /// # Errors
    /// [`OrderError`] when a creation invariant is violated. Product-catalog
    /// existence is NOT checked here; that lookup belongs to the catalog the
    /// caller queries.
    pub fn create(
        id: Uuid,
        customer_id: Uuid,
        shipping_address: impl Into<String>,
        mut items: Vec<OrderItemSnapshot>,
        now: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        let shipping_address = shipping_address.into();
        if shipping_address.trim().is_empty() {
            return Err(OrderError::EmptyShippingAddress);
        }
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        items.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        for pair in items.windows(2) {
            if pair[0].product_id == pair[1].product_id {
                return Err(OrderError::DuplicateProduct {
                    product_id: pair[0].product_id.clone(),
                });
            }
        }
        if let Some(item) = items.iter().find(|i| i.quantity == 0) {
            return Err(OrderError::ZeroQuantity {
                product_id: item.product_id.clone(),
            });
        }

        Ok(Self {
            id,
            customer_id,
            status: OrderStatus::Confirmed,
            order_date: now,
            receipt_date: None,
            shipping_address,
            items,
        })
    }

    /// Request a status change.
    ///
    /// Delegates the decision to [`classify_transition`]; on `Ok` the new
    /// status has been assigned, on `Err` the record is untouched. This is
    /// the only place in the workspace that writes the status field.
    pub fn change_status(
        &mut self,
        requested: OrderStatus,
    ) -> Result<OrderStatus, TransitionRejected> {
        let new_status = classify_transition(self.status, requested)?;
        self.status = new_status;
        Ok(new_status)
    }

    /// Replace the shipping address.
    ///
    /// # Errors
    /// [`OrderError::AddressLocked`] once the order has left `Confirmed`;
    /// [`OrderError::EmptyShippingAddress`] for a blank replacement.
    pub fn update_shipping_address(
        &mut self,
        shipping_address: impl Into<String>,
    ) -> Result<(), OrderError> {
        if self.status != OrderStatus::Confirmed {
            return Err(OrderError::AddressLocked { status: self.status });
        }
        let shipping_address = shipping_address.into();
        if shipping_address.trim().is_empty() {
            return Err(OrderError::EmptyShippingAddress);
        }
        self.shipping_address = shipping_address;
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer_id(&self) -> Uuid {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn receipt_date(&self) -> Option<DateTime<Utc>> {
        self.receipt_date
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn items(&self) -> &[OrderItemSnapshot] {
        &self.items
    }

    /// Serialized view of this record for the JSON boundary.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id,
            customer_id: self.customer_id,
            status: self.status.to_string(),
            order_date: self.order_date,
            receipt_date: self.receipt_date,
            shipping_address: self.shipping_address.clone(),
            items: self.items.clone(),
        }
    }

    /// Rehydrate a record from its serialized view.
    ///
    /// Trusts the snapshot's fields (they were validated at creation) except
    /// the status string, which must name one of the five statuses.
    pub fn from_snapshot(snap: OrderSnapshot) -> Result<Self, UnknownStatus> {
        let status = snap.status.parse()?;
        Ok(Self {
            id: snap.id,
            customer_id: snap.customer_id,
            status,
            order_date: snap.order_date,
            receipt_date: snap.receipt_date,
            shipping_address: snap.shipping_address,
            items: snap.items,
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: u32) -> OrderItemSnapshot {
        OrderItemSnapshot {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    fn confirmed_order(items: Vec<OrderItemSnapshot>) -> Result<OrderRecord, OrderError> {
        OrderRecord::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "1 Main St, Springfield",
            items,
            Utc::now(),
        )
    }

    #[test]
    fn create_starts_confirmed_without_receipt_date() {
        let order = confirmed_order(vec![item("p-1", 2)]).unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(order.receipt_date(), None);
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn items_are_sorted_by_product_id() {
        let order = confirmed_order(vec![item("p-9", 1), item("p-1", 3)]).unwrap();
        let ids: Vec<&str> = order.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["p-1", "p-9"]);
    }

    #[test]
    fn duplicate_product_rejected() {
        // Duplicates need not be adjacent in the input; the sort makes them so.
        let err = confirmed_order(vec![item("p-1", 1), item("p-2", 1), item("p-1", 4)])
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid duplicate Products with Id:p-1");
    }

    #[test]
    fn creation_invariants_rejected() {
        assert_eq!(confirmed_order(vec![]).unwrap_err(), OrderError::NoItems);
        assert_eq!(
            confirmed_order(vec![item("p-1", 0)]).unwrap_err(),
            OrderError::ZeroQuantity {
                product_id: "p-1".into()
            }
        );
        let err = OrderRecord::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "   ",
            vec![item("p-1", 1)],
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, OrderError::EmptyShippingAddress);
    }

    #[test]
    fn change_status_persists_on_success_only() {
        let mut order = confirmed_order(vec![item("p-1", 1)]).unwrap();

        let err = order.change_status(OrderStatus::Receipted).unwrap_err();
        assert_eq!(err.to_string(), "Order is Confirmed can't mark it Receipted");
        assert_eq!(order.status(), OrderStatus::Confirmed, "rejection must not mutate");

        assert_eq!(
            order.change_status(OrderStatus::Shipped),
            Ok(OrderStatus::Shipped)
        );
        assert_eq!(order.status(), OrderStatus::Shipped);
    }

    #[test]
    fn receipt_does_not_stamp_receipt_date() {
        let mut order = confirmed_order(vec![item("p-1", 1)]).unwrap();
        order.change_status(OrderStatus::Shipped).unwrap();
        order.change_status(OrderStatus::Receipted).unwrap();
        // Observed behavior of the order flow: receipt never stamps the date.
        assert_eq!(order.receipt_date(), None);
    }

    #[test]
    fn address_mutable_only_while_confirmed() {
        let mut order = confirmed_order(vec![item("p-1", 1)]).unwrap();
        order.update_shipping_address("2 Oak Ave").unwrap();
        assert_eq!(order.shipping_address(), "2 Oak Ave");

        order.change_status(OrderStatus::Shipped).unwrap();
        let err = order.update_shipping_address("3 Elm Rd").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order is already Shipped can't change the shipping address"
        );
        assert_eq!(order.shipping_address(), "2 Oak Ave");
    }

    #[test]
    fn snapshot_round_trips() {
        let order = confirmed_order(vec![item("p-1", 2), item("p-2", 1)]).unwrap();
        let snap = order.snapshot();
        assert_eq!(snap.status, "Confirmed");
        let back = OrderRecord::from_snapshot(snap).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn snapshot_with_unknown_status_rejected() {
        let mut snap = confirmed_order(vec![item("p-1", 1)]).unwrap().snapshot();
        snap.status = "Misplaced".to_string();
        let err = OrderRecord::from_snapshot(snap).unwrap_err();
        assert_eq!(err.to_string(), "unknown order status: \"Misplaced\"");
    }
}
