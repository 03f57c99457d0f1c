//! Item Store
//!
//! In-memory collections of pending items and deliveries, the unit of
//! mutation for both modules. Newest records sit at the front of each
//! collection.

use crate::domain::{DeliveryItem, DomainError, DomainResult, PendingItem};

/// Both collections plus the identity allocator
#[derive(Clone, Debug, Default)]
pub struct ItemStore {
    pending: Vec<PendingItem>,
    deliveries: Vec<DeliveryItem>,
    /// Highest numeric identity issued or loaded so far
    last_issued_id: i64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the store from persisted snapshots
    pub fn from_collections(pending: Vec<PendingItem>, deliveries: Vec<DeliveryItem>) -> Self {
        let last_issued_id = pending
            .iter()
            .map(|p| p.id.as_str())
            .chain(deliveries.iter().map(|d| d.id.as_str()))
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            pending,
            deliveries,
            last_issued_id,
        }
    }

    pub fn pending(&self) -> &[PendingItem] {
        &self.pending
    }

    pub fn deliveries(&self) -> &[DeliveryItem] {
        &self.deliveries
    }

    /// Identity for a record created at `now_ms`.
    ///
    /// The creation time in milliseconds, bumped past the last issued value so
    /// identities are never reused even within one millisecond.
    pub fn allocate_id(&mut self, now_ms: i64) -> DomainResult<String> {
        let bumped = self
            .last_issued_id
            .checked_add(1)
            .ok_or_else(|| DomainError::Internal("identity space exhausted".to_string()))?;
        let next = now_ms.max(bumped);
        self.last_issued_id = next;
        Ok(next.to_string())
    }

    pub fn insert_pending(&mut self, item: PendingItem) {
        self.pending.insert(0, item);
    }

    pub fn insert_delivery(&mut self, item: DeliveryItem) {
        self.deliveries.insert(0, item);
    }

    pub fn find_pending(&self, id: &str) -> Option<&PendingItem> {
        self.pending.iter().find(|item| item.id == id)
    }

    pub fn find_delivery(&self, id: &str) -> Option<&DeliveryItem> {
        self.deliveries.iter().find(|item| item.id == id)
    }

    pub fn pending_mut(&mut self, id: &str) -> DomainResult<&mut PendingItem> {
        self.pending
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("pending item {}", id)))
    }

    pub fn delivery_mut(&mut self, id: &str) -> DomainResult<&mut DeliveryItem> {
        self.deliveries
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("delivery {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewPendingItem, Priority};
    use chrono::NaiveDate;

    fn pending(id: &str, title: &str) -> PendingItem {
        PendingItem::create(
            id.to_string(),
            NewPendingItem {
                title: title.to_string(),
                description: "desc".to_string(),
                priority: Priority::Medium,
                deadline: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                responsible: None,
                location: None,
                photo: None,
            },
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_allocate_id_never_repeats_within_a_millisecond() {
        let mut store = ItemStore::new();
        let a = store.allocate_id(1_000).unwrap();
        let b = store.allocate_id(1_000).unwrap();
        let c = store.allocate_id(999).unwrap();
        assert_eq!(a, "1000");
        assert_eq!(b, "1001");
        assert_eq!(c, "1002");
        assert_eq!(store.allocate_id(5_000).unwrap(), "5000");
    }

    #[test]
    fn test_allocate_id_resumes_after_loaded_ids() {
        let mut store = ItemStore::from_collections(
            vec![pending("2000", "a"), pending("legacy-id", "b")],
            Vec::new(),
        );
        assert_eq!(store.allocate_id(1_500).unwrap(), "2001");
    }

    #[test]
    fn test_allocate_id_refuses_to_overflow() {
        let max = i64::MAX.to_string();
        let mut store = ItemStore::from_collections(vec![pending(&max, "last")], Vec::new());

        let err = store.allocate_id(1_000).unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
        assert!(matches!(store.allocate_id(i64::MAX), Err(DomainError::Internal(_))));
    }

    #[test]
    fn test_insert_puts_newest_first() {
        let mut store = ItemStore::new();
        store.insert_pending(pending("1", "older"));
        store.insert_pending(pending("2", "newer"));
        assert_eq!(store.pending()[0].title, "newer");
        assert_eq!(store.pending()[1].title, "older");
    }

    #[test]
    fn test_lookup_missing_item() {
        let mut store = ItemStore::new();
        assert!(store.find_pending("nope").is_none());
        assert!(matches!(store.pending_mut("nope"), Err(DomainError::NotFound(_))));
        assert!(matches!(store.delivery_mut("nope"), Err(DomainError::NotFound(_))));
    }
}
