//! In-memory order directory.
//!
//! Deterministic registry of [`OrderRecord`]s keyed by order id, backing the
//! CLI and the scenario tests. Implements the caller side of the lifecycle
//! contract: resolve the order, fail with not-found if absent, delegate the
//! decision to the record, persist on success. `BTreeMap` keeps iteration
//! (and therefore ledger-file output) deterministic.
//!
//! The API is `&mut self`; serializing concurrent writers to the same
//! directory is the caller's problem, exactly as a database row lock would be.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::lifecycle::{OrderStatus, TransitionRejected, UnknownStatus};
use crate::record::{OrderError, OrderRecord};
use odk_schemas::{OrderDraft, OrderSnapshot};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything a directory operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No order with the supplied id.
    NotFound,
    /// The lifecycle rejected the requested status change.
    Transition(TransitionRejected),
    /// An order invariant was violated.
    Order(OrderError),
    /// A loaded snapshot carried a status string that names no status.
    UnknownStatus(UnknownStatus),
    /// Two loaded snapshots claimed the same order id.
    DuplicateOrderId { id: Uuid },
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("Order is not found"),
            Self::Transition(e) => e.fmt(f),
            Self::Order(e) => e.fmt(f),
            Self::UnknownStatus(e) => e.fmt(f),
            Self::DuplicateOrderId { id } => write!(f, "duplicate order id in ledger: {id}"),
        }
    }
}

impl std::error::Error for DirectoryError {}

impl From<TransitionRejected> for DirectoryError {
    fn from(e: TransitionRejected) -> Self {
        Self::Transition(e)
    }
}

impl From<OrderError> for DirectoryError {
    fn from(e: OrderError) -> Self {
        Self::Order(e)
    }
}

impl From<UnknownStatus> for DirectoryError {
    fn from(e: UnknownStatus) -> Self {
        Self::UnknownStatus(e)
    }
}

// ---------------------------------------------------------------------------
// OrderDirectory
// ---------------------------------------------------------------------------

/// In-memory map of order id → [`OrderRecord`].
#[derive(Debug, Default, Clone)]
pub struct OrderDirectory {
    orders: BTreeMap<Uuid, OrderRecord>,
}

impl OrderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a directory from serialized snapshots (a loaded ledger file).
    pub fn from_snapshots(snaps: Vec<OrderSnapshot>) -> Result<Self, DirectoryError> {
        let mut orders = BTreeMap::new();
        for snap in snaps {
            let record = OrderRecord::from_snapshot(snap)?;
            let id = record.id();
            if orders.insert(id, record).is_some() {
                return Err(DirectoryError::DuplicateOrderId { id });
            }
        }
        Ok(Self { orders })
    }

    /// Serialized view of every order, in id order.
    pub fn snapshots(&self) -> Vec<OrderSnapshot> {
        self.orders.values().map(OrderRecord::snapshot).collect()
    }

    /// Create a new order from a draft, assigning a fresh id.
    pub fn create(
        &mut self,
        draft: OrderDraft,
        now: DateTime<Utc>,
    ) -> Result<&OrderRecord, DirectoryError> {
        let id = Uuid::new_v4();
        let record = OrderRecord::create(
            id,
            draft.customer_id,
            draft.shipping_address,
            draft.items,
            now,
        )?;
        info!(order_id = %id, customer_id = %record.customer_id(), "order created");
        Ok(self.orders.entry(id).or_insert(record))
    }

    pub fn get(&self, id: Uuid) -> Option<&OrderRecord> {
        self.orders.get(&id)
    }

    /// Every order, in id order.
    pub fn list(&self) -> impl Iterator<Item = &OrderRecord> {
        self.orders.values()
    }

    /// A single customer's orders, in id order.
    pub fn list_for_customer(&self, customer_id: Uuid) -> impl Iterator<Item = &OrderRecord> {
        self.orders
            .values()
            .filter(move |o| o.customer_id() == customer_id)
    }

    /// Request a status change on an existing order.
    pub fn change_status(
        &mut self,
        id: Uuid,
        requested: OrderStatus,
    ) -> Result<OrderStatus, DirectoryError> {
        let order = self.orders.get_mut(&id).ok_or(DirectoryError::NotFound)?;
        match order.change_status(requested) {
            Ok(new_status) => {
                info!(order_id = %id, status = %new_status, "order status changed");
                Ok(new_status)
            }
            Err(rejected) => {
                warn!(order_id = %id, requested = %requested, "status change rejected: {rejected}");
                Err(rejected.into())
            }
        }
    }

    /// Replace the shipping address of an existing order.
    pub fn update_shipping_address(
        &mut self,
        id: Uuid,
        shipping_address: &str,
    ) -> Result<(), DirectoryError> {
        let order = self.orders.get_mut(&id).ok_or(DirectoryError::NotFound)?;
        order.update_shipping_address(shipping_address)?;
        info!(order_id = %id, "shipping address updated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
