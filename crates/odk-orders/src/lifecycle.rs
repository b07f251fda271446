//! Order status lifecycle
//!
//! # Design
//!
//! A purchase order moves through a fixed set of statuses. Every requested
//! move is classified by [`classify_transition`], a pure function over the
//! closed [`OrderStatus`] enum: it never mutates anything, performs no I/O,
//! and is safe to call from any number of threads. Callers are responsible
//! for persisting the returned status; racing updates to the same order must
//! be serialized by whatever store the caller writes to.
//!
//! # State diagram
//!
//! ```text
//!                          ┌────────────► Cancelled (terminal)
//!                          │
//!   create() ──► Confirmed ┼──► Shipped ──► Receipted ──► Returned (terminal)
//!                          │        │
//!                          │        └────► Cancelled
//!                          └ (Confirmed is never a valid request target)
//! ```
//!
//! `Cancelled` and `Returned` are terminal; the single late edge out of
//! `Receipted` is the return flow. Requesting `Confirmed` always fails —
//! orders are born confirmed and can never be re-confirmed.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// All statuses a purchase order can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Initial status; every order is created confirmed.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Cancelled before receipt. **Terminal.**
    Cancelled,
    /// Received by the customer. Only exit is the return flow.
    Receipted,
    /// Returned after receipt. **Terminal.**
    Returned,
}

impl OrderStatus {
    /// Every status, in declaration order. Used by table-driven tests and
    /// by the CLI to report valid values.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Cancelled,
        OrderStatus::Receipted,
        OrderStatus::Returned,
    ];

    /// Returns `true` for the end-of-life statuses. A cancelled order can
    /// still "cancel" again (a quirk of the transition table) but never moves
    /// anywhere new; a returned order accepts nothing at all.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Returned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Cancelled => "Cancelled",
            Self::Receipted => "Receipted",
            Self::Returned => "Returned",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string does not name one of the five statuses.
/// Surfaces on ledger-file loads and CLI argument parsing; a bad name is an
/// error, never coerced to a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Confirmed" => Ok(Self::Confirmed),
            "Shipped" => Ok(Self::Shipped),
            "Cancelled" => Ok(Self::Cancelled),
            "Receipted" => Ok(Self::Receipted),
            "Returned" => Ok(Self::Returned),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionRejected
// ---------------------------------------------------------------------------

/// A disallowed `(current, requested)` pair.
///
/// The `Display` impl is the customer-facing rejection message; callers on an
/// HTTP or CLI boundary render it verbatim (the HTTP layer maps it to a 400).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRejected {
    /// Status the order held when the request arrived.
    pub current: OrderStatus,
    /// Status the caller asked for.
    pub requested: OrderStatus,
}

impl fmt::Display for TransitionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.requested {
            OrderStatus::Confirmed => {
                f.write_str("Error can't confirm, order is by default confirmed")
            }
            OrderStatus::Shipped => {
                write!(f, "Order is {} can't mark it shipped", self.current)
            }
            OrderStatus::Receipted if self.current == OrderStatus::Receipted => {
                f.write_str("Order is already Receipted")
            }
            OrderStatus::Receipted => {
                write!(f, "Order is {} can't mark it Receipted", self.current)
            }
            OrderStatus::Cancelled => {
                write!(f, "Order is {} can't mark it Cancelled", self.current)
            }
            OrderStatus::Returned => {
                write!(f, "Order is {} can't mark it Returned", self.current)
            }
        }
    }
}

impl std::error::Error for TransitionRejected {}

// ---------------------------------------------------------------------------
// classify_transition
// ---------------------------------------------------------------------------

/// Decide whether an order currently in `current` may move to `requested`.
///
/// Pure and synchronous. On `Ok` the caller persists the returned status; on
/// `Err` nothing about the order changes and the error's `Display` output is
/// the rejection message.
///
/// Transition table:
///
/// | current                   | requested   | outcome                      |
/// |---------------------------|-------------|------------------------------|
/// | `Confirmed`               | `Shipped`   | allowed                      |
/// | `Shipped`                 | `Receipted` | allowed                      |
/// | not `Receipted|Returned`  | `Cancelled` | allowed                      |
/// | `Receipted`               | `Returned`  | allowed                      |
/// | any                       | `Confirmed` | rejected                     |
/// | anything else             | any         | rejected                     |
pub fn classify_transition(
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<OrderStatus, TransitionRejected> {
    use OrderStatus::*;

    let allowed = match requested {
        Shipped => current == Confirmed,
        Receipted => current == Shipped,
        Cancelled => !matches!(current, Receipted | Returned),
        Returned => current == Receipted,
        // Orders are confirmed at creation; re-confirming is never valid.
        Confirmed => false,
    };

    if allowed {
        Ok(requested)
    } else {
        Err(TransitionRejected { current, requested })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
