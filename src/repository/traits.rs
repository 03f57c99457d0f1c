//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for collection snapshots.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{DomainResult, Entity};

/// Snapshot repository for one collection
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Load the whole collection, in stored order. A missing slot is empty.
    async fn load_all(&self) -> DomainResult<Vec<T>>;

    /// Replace the whole collection
    async fn save_all(&self, items: &[T]) -> DomainResult<()>;
}

/// Entities stored under a fixed slot name
pub trait Persisted: Entity + Serialize + DeserializeOwned + 'static {
    const SLOT: &'static str;
}
