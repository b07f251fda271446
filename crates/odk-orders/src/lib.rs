//! odk-orders
//!
//! Order lifecycle core:
//! - `lifecycle` — the closed status enum and the pure transition classifier
//! - `record` — the order aggregate that owns the invariant boundary
//! - `directory` — deterministic in-memory registry implementing the caller
//!   contract (resolve, classify, persist)
//!
//! All of it is synchronous and free of IO; persistence and transport live in
//! the callers.

pub mod lifecycle;

mod directory;
mod record;

pub use directory::{DirectoryError, OrderDirectory};
pub use lifecycle::{classify_transition, OrderStatus, TransitionRejected, UnknownStatus};
pub use record::{OrderError, OrderRecord};
