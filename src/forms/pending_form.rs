//! Pending Item Form
//!
//! Holds what the user has typed so far on the "new pending item" screen.
//! Nothing is recorded until [`PendingForm::to_new_item`] is submitted.

use chrono::NaiveDate;

use crate::domain::{DomainError, DomainResult, NewPendingItem, Priority};
use crate::suggest::Suggestion;

/// Placeholder title used when a delivery problem seeds the form
pub const DRAFT_TITLE: &str = "Delivery Issue";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub responsible: String,
    pub location: String,
    photo: Option<String>,
}

impl PendingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    /// Attach a photo, replacing any previous one
    pub fn attach_photo(&mut self, data: impl Into<String>) {
        let data = data.into();
        self.photo = if data.is_empty() { None } else { Some(data) };
    }

    /// Seed the form from a delivery problem: fixed title, given description, high priority
    pub fn apply_draft(&mut self, description: &str) {
        self.title = DRAFT_TITLE.to_string();
        self.description = description.to_string();
        self.priority = Priority::High;
    }

    /// Overwrite title, description and priority with an image suggestion
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) {
        self.title = suggestion.title.clone();
        self.description = suggestion.description.clone();
        self.priority = suggestion.priority;
    }

    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty() && self.deadline.is_some()
    }

    pub fn to_new_item(&self) -> DomainResult<NewPendingItem> {
        let deadline = self
            .deadline
            .ok_or_else(|| DomainError::InvalidInput("deadline is required".to_string()))?;

        Ok(NewPendingItem {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            deadline,
            responsible: optional(&self.responsible),
            location: optional(&self.location),
            photo: self.photo.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PendingForm {
        PendingForm {
            title: "Exposed rebar".to_string(),
            description: "Rebar visible on column C3".to_string(),
            deadline: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..PendingForm::default()
        }
    }

    #[test]
    fn test_defaults_to_medium_priority() {
        let form = PendingForm::new();
        assert_eq!(form.priority, Priority::Medium);
        assert!(form.photo().is_none());
        assert!(!form.can_submit());
    }

    #[test]
    fn test_can_submit_requires_deadline() {
        let mut form = filled();
        assert!(form.can_submit());
        form.deadline = None;
        assert!(!form.can_submit());
        assert!(matches!(form.to_new_item(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_blank_optional_fields_are_omitted() {
        let mut form = filled();
        form.responsible = "  ".to_string();
        form.location = "Tower A".to_string();
        let input = form.to_new_item().unwrap();
        assert_eq!(input.responsible, None);
        assert_eq!(input.location.as_deref(), Some("Tower A"));
    }

    #[test]
    fn test_draft_forces_title_and_priority() {
        let mut form = filled();
        form.priority = Priority::Low;
        form.apply_draft("Broken pallets");
        assert_eq!(form.title, DRAFT_TITLE);
        assert_eq!(form.description, "Broken pallets");
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.deadline, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_attach_photo_keeps_at_most_one() {
        let mut form = PendingForm::new();
        form.attach_photo("data:image/jpeg;base64,AAA");
        form.attach_photo("data:image/jpeg;base64,BBB");
        assert_eq!(form.photo(), Some("data:image/jpeg;base64,BBB"));
        form.reset();
        assert!(form.photo().is_none());
    }

    #[test]
    fn test_apply_suggestion_keeps_other_fields() {
        let mut form = filled();
        form.location = "Roof".to_string();
        form.apply_suggestion(&Suggestion {
            title: "Water infiltration".to_string(),
            description: "Stain on ceiling".to_string(),
            priority: Priority::High,
        });
        assert_eq!(form.title, "Water infiltration");
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.location, "Roof");
    }
}
