//! Slot Repository
//!
//! SQLite-backed snapshot storage: one JSON array per named slot, replaced
//! atomically with a single `INSERT OR REPLACE`.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::{Persisted, Repository};
use crate::domain::{DeliveryItem, DomainError, DomainResult, PendingItem};

pub const PENDING_SLOT: &str = "obragester_pending_v1";
pub const DELIVERY_SLOT: &str = "obragester_delivery_v1";

impl Persisted for PendingItem {
    const SLOT: &'static str = PENDING_SLOT;
}

impl Persisted for DeliveryItem {
    const SLOT: &'static str = DELIVERY_SLOT;
}

/// SQLite implementation of a collection slot
pub struct SlotRepository<T> {
    conn: Arc<Mutex<Connection>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Persisted> SlotRepository<T> {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub fn slot(&self) -> &'static str {
        T::SLOT
    }
}

#[async_trait]
impl<T: Persisted> Repository<T> for SlotRepository<T> {
    async fn load_all(&self) -> DomainResult<Vec<T>> {
        let conn = self.conn.lock().await;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM collections WHERE slot = ?1",
                params![T::SLOT],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        match payload {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                DomainError::Storage(format!("Malformed snapshot in {}: {}", T::SLOT, e))
            }),
        }
    }

    async fn save_all(&self, items: &[T]) -> DomainResult<()> {
        let payload = serde_json::to_string(items)
            .map_err(|e| DomainError::Internal(format!("Failed to serialize {}: {}", T::SLOT, e)))?;
        let updated_at = chrono::Utc::now().timestamp_millis();

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO collections (slot, payload, updated_at) VALUES (?1, ?2, ?3)",
            params![T::SLOT, payload, updated_at],
        )
        .map_err(|e| DomainError::Storage(e.to_string()))?;

        log::debug!("Saved {} records to {}", items.len(), T::SLOT);
        Ok(())
    }
}
