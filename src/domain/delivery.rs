//! Delivery Item Entity
//!
//! A material shipment with a scheduling-and-receipt lifecycle:
//! `Scheduled -> Arrived -> Checked | Issue`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// Delivery lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Scheduled,
    Arrived,
    Checked,
    Issue,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Scheduled => "scheduled",
            DeliveryStatus::Arrived => "arrived",
            DeliveryStatus::Checked => "checked",
            DeliveryStatus::Issue => "issue",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Checked | DeliveryStatus::Issue)
    }
}

/// Result chosen by the receiver when confirming a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptOutcome {
    Checked,
    Issue,
}

impl ReceiptOutcome {
    pub fn status(&self) -> DeliveryStatus {
        match self {
            ReceiptOutcome::Checked => DeliveryStatus::Checked,
            ReceiptOutcome::Issue => DeliveryStatus::Issue,
        }
    }
}

/// Receiver identity and signature captured at the gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    pub receiver_name: String,
    /// Encoded signature image
    pub signature: String,
}

impl Receipt {
    pub fn new(receiver_name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            receiver_name: receiver_name.into(),
            signature: signature.into(),
        }
    }

    /// Both fields present; the confirm actions stay disabled otherwise
    pub fn is_complete(&self) -> bool {
        !self.receiver_name.trim().is_empty() && !self.signature.is_empty()
    }
}

/// Input for scheduling a delivery
#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub material: String,
    pub supplier: String,
    pub quantity: f64,
    pub unit: String,
    pub scheduled_arrival: NaiveDateTime,
    pub invoice_number: Option<String>,
}

/// A tracked material shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItem {
    pub id: String,
    pub material: String,
    pub supplier: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(rename = "arrivalDate")]
    pub scheduled_arrival: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    received_by: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    received_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue_reported: Option<bool>,
}

impl DeliveryItem {
    /// Map a submitted form to a new `Scheduled` record
    pub fn create(id: String, input: NewDelivery) -> DomainResult<Self> {
        if !input.quantity.is_finite() || input.quantity <= 0.0 {
            return Err(DomainError::InvalidInput(
                "quantity must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            id,
            material: required(input.material, "material")?,
            supplier: required(input.supplier, "supplier")?,
            quantity: input.quantity,
            unit: required(input.unit, "unit")?,
            scheduled_arrival: input.scheduled_arrival,
            invoice_number: input
                .invoice_number
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            status: DeliveryStatus::Scheduled,
            received_by: None,
            received_at: None,
            signature: None,
            issue_reported: None,
        })
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn received_by(&self) -> Option<&str> {
        self.received_by.as_deref()
    }

    pub fn received_at(&self) -> Option<i64> {
        self.received_at
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// `None` until the delivery has been received
    pub fn issue_reported(&self) -> Option<bool> {
        self.issue_reported
    }

    pub fn mark_arrived(&mut self) -> DomainResult<()> {
        if self.status != DeliveryStatus::Scheduled {
            return Err(DomainError::invalid_transition(self.status.as_str(), "mark arrived"));
        }
        self.status = DeliveryStatus::Arrived;
        Ok(())
    }

    /// Confirm receipt of an arrived delivery.
    ///
    /// Blocked unless the delivery is `Arrived` and the receipt carries both a
    /// receiver name and a signature.
    pub fn receive(
        &mut self,
        receipt: &Receipt,
        outcome: ReceiptOutcome,
        received_at: i64,
    ) -> DomainResult<DeliveryStatus> {
        if self.status != DeliveryStatus::Arrived {
            return Err(DomainError::invalid_transition(self.status.as_str(), "receive"));
        }
        if !receipt.is_complete() {
            return Err(DomainError::InvalidInput(
                "receiver name and signature are required".to_string(),
            ));
        }

        self.status = outcome.status();
        self.received_by = Some(receipt.receiver_name.trim().to_string());
        self.received_at = Some(received_at);
        self.signature = Some(receipt.signature.clone());
        self.issue_reported = Some(outcome == ReceiptOutcome::Issue);
        Ok(self.status)
    }
}

impl Entity for DeliveryItem {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Coerce a quantity typed into the form into a positive number.
///
/// Accepts a decimal comma ("2,5").
pub fn parse_quantity(raw: &str) -> DomainResult<f64> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(q) if q.is_finite() && q > 0.0 => Ok(q),
        _ => Err(DomainError::InvalidInput(format!(
            "quantity must be a positive number, got {:?}",
            raw
        ))),
    }
}

fn required(value: String, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cement() -> DeliveryItem {
        DeliveryItem::create(
            "1".to_string(),
            NewDelivery {
                material: "Cement".to_string(),
                supplier: "ABC Log".to_string(),
                quantity: 50.0,
                unit: "bags".to_string(),
                scheduled_arrival: NaiveDateTime::parse_from_str("2024-06-01T08:30", "%Y-%m-%dT%H:%M").unwrap(),
                invoice_number: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_starts_scheduled_without_receipt() {
        let delivery = cement();
        assert_eq!(delivery.status(), DeliveryStatus::Scheduled);
        assert!(delivery.received_by().is_none());
        assert!(delivery.received_at().is_none());
        assert!(delivery.signature().is_none());
        assert!(delivery.issue_reported().is_none());
    }

    #[test]
    fn test_create_rejects_non_positive_quantity() {
        let input = NewDelivery {
            material: "Sand".to_string(),
            supplier: "Quarry".to_string(),
            quantity: 0.0,
            unit: "m3".to_string(),
            scheduled_arrival: NaiveDateTime::parse_from_str("2024-06-01T08:30", "%Y-%m-%dT%H:%M").unwrap(),
            invoice_number: Some("  ".to_string()),
        };
        assert!(matches!(
            DeliveryItem::create("1".to_string(), input),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_receipt_blocked_without_signature() {
        let mut delivery = cement();
        delivery.mark_arrived().unwrap();

        let err = delivery
            .receive(&Receipt::new("Joao", ""), ReceiptOutcome::Checked, 10)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(delivery.status(), DeliveryStatus::Arrived);
        assert!(delivery.received_by().is_none());

        let err = delivery
            .receive(&Receipt::new(" ", "data:image/png;base64,AAA"), ReceiptOutcome::Checked, 10)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_receipt_populates_all_fields() {
        let mut delivery = cement();
        delivery.mark_arrived().unwrap();

        let status = delivery
            .receive(&Receipt::new("Joao", "sig"), ReceiptOutcome::Issue, 1_717_000_000_000)
            .unwrap();
        assert_eq!(status, DeliveryStatus::Issue);
        assert_eq!(delivery.received_by(), Some("Joao"));
        assert_eq!(delivery.received_at(), Some(1_717_000_000_000));
        assert_eq!(delivery.signature(), Some("sig"));
        assert_eq!(delivery.issue_reported(), Some(true));
    }

    #[test]
    fn test_checked_outcome_clears_issue_flag() {
        let mut delivery = cement();
        delivery.mark_arrived().unwrap();
        delivery
            .receive(&Receipt::new("Joao", "sig"), ReceiptOutcome::Checked, 5)
            .unwrap();
        assert_eq!(delivery.status(), DeliveryStatus::Checked);
        assert_eq!(delivery.issue_reported(), Some(false));
    }

    #[test]
    fn test_receive_requires_arrived() {
        let mut delivery = cement();
        let err = delivery
            .receive(&Receipt::new("Joao", "sig"), ReceiptOutcome::Checked, 5)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        delivery.mark_arrived().unwrap();
        assert!(delivery.mark_arrived().is_err());
        delivery
            .receive(&Receipt::new("Joao", "sig"), ReceiptOutcome::Checked, 5)
            .unwrap();
        assert!(delivery
            .receive(&Receipt::new("Joao", "sig"), ReceiptOutcome::Issue, 6)
            .is_err());
        assert!(delivery.status().is_terminal());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("50").unwrap(), 50.0);
        assert_eq!(parse_quantity(" 2,5 ").unwrap(), 2.5);
        assert!(parse_quantity("-3").is_err());
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut delivery = cement();
        let json = serde_json::to_value(&delivery).unwrap();
        assert_eq!(json["arrivalDate"], "2024-06-01T08:30:00");
        assert_eq!(json["status"], "scheduled");
        assert!(json.get("receivedBy").is_none());

        delivery.mark_arrived().unwrap();
        delivery
            .receive(&Receipt::new("Joao", "sig"), ReceiptOutcome::Checked, 5)
            .unwrap();
        let json = serde_json::to_value(&delivery).unwrap();
        assert_eq!(json["receivedBy"], "Joao");
        assert_eq!(json["issueReported"], false);
    }
}
