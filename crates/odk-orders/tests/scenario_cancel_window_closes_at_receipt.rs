//! Scenario: Cancel Window Closes At Receipt
//!
//! # Invariant under test
//! An order may be cancelled at any point before the customer has it in hand:
//! `Confirmed` and `Shipped` both accept `Cancelled`. The moment the order is
//! `Receipted` (or later `Returned`), cancellation is rejected — the goods
//! have changed hands and only the return flow applies.

use chrono::Utc;
use odk_orders::{OrderDirectory, OrderStatus};
use odk_schemas::{OrderDraft, OrderItemSnapshot};
use uuid::Uuid;

fn new_order(dir: &mut OrderDirectory) -> Uuid {
    let draft = OrderDraft {
        customer_id: Uuid::new_v4(),
        shipping_address: "7 Quay Street".to_string(),
        items: vec![OrderItemSnapshot {
            product_id: "lamp-02".to_string(),
            quantity: 1,
        }],
    };
    dir.create(draft, Utc::now()).unwrap().id()
}

#[test]
fn confirmed_order_cancels() {
    let mut dir = OrderDirectory::new();
    let id = new_order(&mut dir);

    assert_eq!(
        dir.change_status(id, OrderStatus::Cancelled).unwrap(),
        OrderStatus::Cancelled
    );
    assert!(dir.get(id).unwrap().status().is_terminal());
}

#[test]
fn shipped_order_still_cancels() {
    let mut dir = OrderDirectory::new();
    let id = new_order(&mut dir);
    dir.change_status(id, OrderStatus::Shipped).unwrap();

    assert_eq!(
        dir.change_status(id, OrderStatus::Cancelled).unwrap(),
        OrderStatus::Cancelled
    );
}

#[test]
fn receipted_order_cannot_cancel() {
    let mut dir = OrderDirectory::new();
    let id = new_order(&mut dir);
    dir.change_status(id, OrderStatus::Shipped).unwrap();
    dir.change_status(id, OrderStatus::Receipted).unwrap();

    let err = dir.change_status(id, OrderStatus::Cancelled).unwrap_err();
    assert_eq!(err.to_string(), "Order is Receipted can't mark it Cancelled");
    assert_eq!(dir.get(id).unwrap().status(), OrderStatus::Receipted);
}

#[test]
fn returned_order_cannot_cancel() {
    let mut dir = OrderDirectory::new();
    let id = new_order(&mut dir);
    dir.change_status(id, OrderStatus::Shipped).unwrap();
    dir.change_status(id, OrderStatus::Receipted).unwrap();
    dir.change_status(id, OrderStatus::Returned).unwrap();

    let err = dir.change_status(id, OrderStatus::Cancelled).unwrap_err();
    assert_eq!(err.to_string(), "Order is Returned can't mark it Cancelled");
}

#[test]
fn cancelled_order_never_ships_or_receipts() {
    let mut dir = OrderDirectory::new();
    let id = new_order(&mut dir);
    dir.change_status(id, OrderStatus::Cancelled).unwrap();

    let err = dir.change_status(id, OrderStatus::Shipped).unwrap_err();
    assert_eq!(err.to_string(), "Order is Cancelled can't mark it shipped");
    let err = dir.change_status(id, OrderStatus::Receipted).unwrap_err();
    assert_eq!(err.to_string(), "Order is Cancelled can't mark it Receipted");
    let err = dir.change_status(id, OrderStatus::Confirmed).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error can't confirm, order is by default confirmed"
    );
}
