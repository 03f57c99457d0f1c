//! Domain Layer
//!
//! Contains all domain entities and core workflow rules.
//! This layer has NO external dependencies (except serde/chrono for data types).

mod entity;
mod pending;
mod delivery;

pub use entity::{Entity, DomainError, DomainResult};
pub use pending::{
    list_pending, NewPendingItem, PendingAction, PendingItem, PendingStatus, Priority, StatusFilter,
    DEFAULT_LOCATION, DEFAULT_RESPONSIBLE,
};
pub use delivery::{
    parse_quantity, DeliveryItem, DeliveryStatus, NewDelivery, Receipt, ReceiptOutcome,
};
