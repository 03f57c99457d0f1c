//! Pending Item Commands
//!
//! Creation from the pending form, the named status transitions, and the
//! filtered list.

use crate::domain::{
    list_pending, DomainError, DomainResult, PendingAction, PendingItem, StatusFilter,
};
use crate::{now_ms, AppState};

/// Pending items matching the current filter, most urgent first
pub fn list_pending_items(state: &AppState) -> Vec<&PendingItem> {
    list_pending(state.store.pending(), state.ui.status_filter)
}

pub fn set_status_filter(state: &mut AppState, filter: StatusFilter) {
    state.ui.status_filter = filter;
}

/// Attach a photo to the open pending form
pub fn attach_photo(state: &mut AppState, data: String) {
    state.ui.pending_form.attach_photo(data);
}

/// Submit the pending form
pub async fn create_pending(state: &mut AppState) -> DomainResult<PendingItem> {
    if !state.ui.pending_form.can_submit() {
        return Err(DomainError::InvalidInput(
            "title, description and deadline are required".to_string(),
        ));
    }
    let input = state.ui.pending_form.to_new_item()?;

    let now = now_ms();
    let id = state.store.allocate_id(now)?;
    let item = PendingItem::create(id, input, now)?;

    state.store.insert_pending(item.clone());
    state.ui.form_submitted();
    state.persist_pending().await;

    log::info!("Created pending item {} ({})", item.id, item.priority.as_str());
    Ok(item)
}

async fn perform(state: &mut AppState, id: &str, action: PendingAction) -> DomainResult<PendingItem> {
    let item = state.store.pending_mut(id)?;
    let status = item.perform(action)?;
    let updated = item.clone();

    state.persist_pending().await;
    log::info!("Pending item {} -> {}", id, status.as_str());
    Ok(updated)
}

/// Open -> InProgress
pub async fn start_pending(state: &mut AppState, id: &str) -> DomainResult<PendingItem> {
    perform(state, id, PendingAction::Start).await
}

/// InProgress -> WaitingApproval
pub async fn complete_pending(state: &mut AppState, id: &str) -> DomainResult<PendingItem> {
    perform(state, id, PendingAction::Complete).await
}

/// WaitingApproval -> Resolved
pub async fn approve_pending(state: &mut AppState, id: &str) -> DomainResult<PendingItem> {
    perform(state, id, PendingAction::Approve).await
}

/// WaitingApproval -> Rejected
pub async fn reject_pending(state: &mut AppState, id: &str) -> DomainResult<PendingItem> {
    perform(state, id, PendingAction::Reject).await
}

/// Rejected -> InProgress
pub async fn restart_pending(state: &mut AppState, id: &str) -> DomainResult<PendingItem> {
    perform(state, id, PendingAction::Restart).await
}
