//! Cross-Module Bridge
//!
//! Hands a delivery received with a problem over to the pending module as a
//! pre-filled draft. Holds no state of its own beyond the draft it leaves in
//! the [`UiContext`].

use crate::context::{Module, PendingDraft, UiContext};
use crate::domain::{DeliveryItem, DeliveryStatus};

pub const REDIRECT_NOTICE: &str = "Redirected to register the delivery issue";

/// Human-readable problem report embedding the delivery details
pub fn issue_description(delivery: &DeliveryItem) -> String {
    format!(
        "Delivery issue reported. Material: {}. Supplier: {}. Qty: {} {}.",
        delivery.material, delivery.supplier, delivery.quantity, delivery.unit
    )
}

/// React to a delivery that was just received.
///
/// Only an `Issue` outcome redirects: the draft is stored (replacing any
/// unconsumed one), the pending form opens with it, and a notice is shown for
/// `notice_duration_ms`. Returns whether the redirect happened.
pub fn on_delivery_received(
    ui: &mut UiContext,
    delivery: &DeliveryItem,
    now_ms: i64,
    notice_duration_ms: i64,
) -> bool {
    if delivery.status() != DeliveryStatus::Issue {
        return false;
    }

    ui.set_draft(PendingDraft {
        description: issue_description(delivery),
    });
    ui.switch_module(Module::Pending);
    ui.open_form();
    ui.show_notice(REDIRECT_NOTICE, now_ms, notice_duration_ms);

    log::info!("Delivery {} reported with a problem, pending draft opened", delivery.id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::View;
    use crate::domain::{NewDelivery, Priority, Receipt, ReceiptOutcome};
    use crate::forms::DRAFT_TITLE;
    use chrono::NaiveDateTime;

    fn received(outcome: ReceiptOutcome) -> DeliveryItem {
        let mut delivery = DeliveryItem::create(
            "1".to_string(),
            NewDelivery {
                material: "Cement".to_string(),
                supplier: "ABC Log".to_string(),
                quantity: 50.0,
                unit: "bags".to_string(),
                scheduled_arrival: NaiveDateTime::parse_from_str("2024-06-01T10:00", "%Y-%m-%dT%H:%M").unwrap(),
                invoice_number: Some("NF-123".to_string()),
            },
        )
        .unwrap();
        delivery.mark_arrived().unwrap();
        delivery
            .receive(&Receipt::new("Joao", "sig"), outcome, 1_000)
            .unwrap();
        delivery
    }

    #[test]
    fn test_description_embeds_delivery_details() {
        let text = issue_description(&received(ReceiptOutcome::Issue));
        assert_eq!(
            text,
            "Delivery issue reported. Material: Cement. Supplier: ABC Log. Qty: 50 bags."
        );
    }

    #[test]
    fn test_issue_opens_pending_form_with_draft() {
        let mut ui = UiContext::new();
        ui.switch_module(Module::Delivery);

        assert!(on_delivery_received(&mut ui, &received(ReceiptOutcome::Issue), 10_000, 3_000));
        assert_eq!(ui.active_module(), Module::Pending);
        assert_eq!(ui.view(), View::PendingForm);
        assert_eq!(ui.pending_form.title, DRAFT_TITLE);
        assert_eq!(ui.pending_form.priority, Priority::High);
        for part in ["Cement", "ABC Log", "50", "bags"] {
            assert!(ui.pending_form.description.contains(part));
        }
        assert_eq!(ui.notice(12_999).map(|n| n.message.as_str()), Some(REDIRECT_NOTICE));
        assert!(ui.notice(13_000).is_none());
    }

    #[test]
    fn test_checked_does_not_redirect() {
        let mut ui = UiContext::new();
        ui.switch_module(Module::Delivery);

        assert!(!on_delivery_received(&mut ui, &received(ReceiptOutcome::Checked), 0, 3_000));
        assert_eq!(ui.active_module(), Module::Delivery);
        assert_eq!(ui.view(), View::DeliveryList);
        assert!(ui.draft().is_none());
        assert!(ui.notice(0).is_none());
    }
}
