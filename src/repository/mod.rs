//! Repository Layer
//!
//! Persistence gateway: each collection lives in one named slot and is
//! always read and written as a whole.

mod traits;
mod db;
mod slot_repo;


pub use traits::{Persisted, Repository};
pub use db::{init_db, DbState};
pub use slot_repo::{SlotRepository, DELIVERY_SLOT, PENDING_SLOT};
