//! Form State
//!
//! Partial records behind the creation screens and the receipt sub-flow,
//! and their mapping to validated domain input.

mod pending_form;
mod delivery_form;

pub use pending_form::{PendingForm, DRAFT_TITLE};
pub use delivery_form::{DeliveryForm, ReceiptForm};
