//! Delivery Commands
//!
//! Scheduling, arrival, and the receipt sub-flow. A delivery received with a
//! problem is handed to the pending module through [`crate::bridge`].

use crate::bridge;
use crate::domain::{DeliveryItem, DeliveryStatus, DomainError, DomainResult, ReceiptOutcome};
use crate::forms::ReceiptForm;
use crate::{now_ms, AppState};

/// Deliveries in stored order, newest first
pub fn list_deliveries(state: &AppState) -> &[DeliveryItem] {
    state.store.deliveries()
}

/// Submit the delivery form
pub async fn create_delivery(state: &mut AppState) -> DomainResult<DeliveryItem> {
    if !state.ui.delivery_form.can_submit() {
        return Err(DomainError::InvalidInput(
            "material, supplier, a positive quantity, unit and arrival are required".to_string(),
        ));
    }
    let input = state.ui.delivery_form.to_new_delivery()?;

    let id = state.store.allocate_id(now_ms())?;
    let item = DeliveryItem::create(id, input)?;

    state.store.insert_delivery(item.clone());
    state.ui.form_submitted();
    state.persist_deliveries().await;

    log::info!("Scheduled delivery {} of {}", item.id, item.material);
    Ok(item)
}

/// Scheduled -> Arrived
pub async fn mark_arrived(state: &mut AppState, id: &str) -> DomainResult<DeliveryItem> {
    let item = state.store.delivery_mut(id)?;
    item.mark_arrived()?;
    let updated = item.clone();

    state.persist_deliveries().await;
    log::info!("Delivery {} arrived", id);
    Ok(updated)
}

/// Open the receipt form for an arrived delivery
pub fn begin_receipt(state: &mut AppState, id: &str) -> DomainResult<()> {
    let status = state
        .store
        .find_delivery(id)
        .ok_or_else(|| DomainError::NotFound(format!("Delivery {}", id)))?
        .status();
    if status != DeliveryStatus::Arrived {
        return Err(DomainError::invalid_transition(status.as_str(), "receive"));
    }

    state.ui.receipt = Some(ReceiptForm::new(id));
    Ok(())
}

pub fn cancel_receipt(state: &mut AppState) {
    state.ui.receipt = None;
}

/// Confirm the open receipt as checked or as a problem.
///
/// Without a receiver name and signature nothing changes and the form stays
/// open. A problem outcome opens a pre-filled pending form.
pub async fn confirm_receipt(
    state: &mut AppState,
    outcome: ReceiptOutcome,
) -> DomainResult<DeliveryItem> {
    let form = state
        .ui
        .receipt
        .as_ref()
        .ok_or_else(|| DomainError::InvalidInput("no receipt in progress".to_string()))?;
    if !form.can_confirm() {
        return Err(DomainError::InvalidInput(
            "receiver name and signature are required".to_string(),
        ));
    }

    let now = now_ms();
    let item = state.store.delivery_mut(&form.delivery_id)?;
    item.receive(&form.receipt, outcome, now)?;
    let updated = item.clone();

    state.ui.receipt = None;
    state.persist_deliveries().await;
    log::info!("Delivery {} received as {}", updated.id, updated.status().as_str());

    bridge::on_delivery_received(&mut state.ui, &updated, now, state.config.notice_duration_ms);
    Ok(updated)
}
