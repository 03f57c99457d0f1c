//! Commands Layer
//!
//! Handlers that bridge UI events to the workflow engines. Each one applies a
//! single user action to the [`AppState`](crate::AppState) and mirrors the
//! changed collection to storage.

mod pending_cmd;
mod delivery_cmd;
mod suggest_cmd;

pub use pending_cmd::*;
pub use delivery_cmd::*;
pub use suggest_cmd::*;
