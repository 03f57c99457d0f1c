//! Delivery Forms
//!
//! The scheduling form and the receipt sub-flow opened on an arrived delivery.

use chrono::NaiveDateTime;

use crate::domain::{parse_quantity, DomainError, DomainResult, NewDelivery, Receipt};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryForm {
    pub material: String,
    pub supplier: String,
    /// Raw text from the quantity input, coerced on submit
    pub quantity: String,
    pub unit: String,
    pub scheduled_arrival: Option<NaiveDateTime>,
    pub invoice_number: String,
}

impl DeliveryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.material.trim().is_empty()
            && !self.supplier.trim().is_empty()
            && !self.unit.trim().is_empty()
            && self.scheduled_arrival.is_some()
            && parse_quantity(&self.quantity).is_ok()
    }

    pub fn to_new_delivery(&self) -> DomainResult<NewDelivery> {
        let scheduled_arrival = self
            .scheduled_arrival
            .ok_or_else(|| DomainError::InvalidInput("scheduled arrival is required".to_string()))?;

        Ok(NewDelivery {
            material: self.material.clone(),
            supplier: self.supplier.clone(),
            quantity: parse_quantity(&self.quantity)?,
            unit: self.unit.clone(),
            scheduled_arrival,
            invoice_number: Some(self.invoice_number.clone()),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Receipt capture for one arrived delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptForm {
    pub delivery_id: String,
    pub receipt: Receipt,
}

impl ReceiptForm {
    pub fn new(delivery_id: impl Into<String>) -> Self {
        Self {
            delivery_id: delivery_id.into(),
            receipt: Receipt::default(),
        }
    }

    pub fn set_receiver_name(&mut self, name: impl Into<String>) {
        self.receipt.receiver_name = name.into();
    }

    /// Store the captured signature; an empty capture clears it
    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.receipt.signature = signature.into();
    }

    /// Whether the "checked" and "problem" actions are enabled
    pub fn can_confirm(&self) -> bool {
        self.receipt.is_complete()
    }
}
