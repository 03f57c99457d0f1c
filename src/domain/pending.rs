//! Pending Item Entity
//!
//! A construction-site issue with a resolution lifecycle:
//! `Open -> InProgress -> WaitingApproval -> Resolved | Rejected`,
//! plus the rework loop `Rejected -> InProgress`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

pub const DEFAULT_RESPONSIBLE: &str = "unassigned";
pub const DEFAULT_LOCATION: &str = "General";

/// Issue priority, ordered Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight, higher is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Lenient parse used for externally produced values.
    ///
    /// Accepts the canonical names in any case and the Portuguese labels the
    /// field crews use ("Baixa", "Média", "Alta").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixa" => Some(Priority::Low),
            "medium" | "média" | "media" => Some(Priority::Medium),
            "high" | "alta" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn all() -> [Priority; 3] {
        [Priority::Low, Priority::Medium, Priority::High]
    }
}

/// Resolution status of a pending item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PendingStatus {
    #[default]
    Open,
    InProgress,
    WaitingApproval,
    Resolved,
    Rejected,
}

impl PendingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingStatus::Open => "open",
            PendingStatus::InProgress => "in_progress",
            PendingStatus::WaitingApproval => "waiting_approval",
            PendingStatus::Resolved => "resolved",
            PendingStatus::Rejected => "rejected",
        }
    }

    pub fn all() -> [PendingStatus; 5] {
        [
            PendingStatus::Open,
            PendingStatus::InProgress,
            PendingStatus::WaitingApproval,
            PendingStatus::Resolved,
            PendingStatus::Rejected,
        ]
    }

    /// Actions a card in this status offers
    pub fn available_actions(&self) -> &'static [PendingAction] {
        match self {
            PendingStatus::Open => &[PendingAction::Start],
            PendingStatus::InProgress => &[PendingAction::Complete],
            PendingStatus::WaitingApproval => &[PendingAction::Approve, PendingAction::Reject],
            PendingStatus::Rejected => &[PendingAction::Restart],
            PendingStatus::Resolved => &[],
        }
    }

    /// Status reached by applying `action`, or an error if the edge does not exist
    pub fn apply(self, action: PendingAction) -> DomainResult<PendingStatus> {
        if action.source() == self {
            Ok(action.target())
        } else {
            Err(DomainError::invalid_transition(self.as_str(), action.as_str()))
        }
    }
}

/// The named transitions of the pending workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAction {
    Start,
    Complete,
    Approve,
    Reject,
    Restart,
}

impl PendingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingAction::Start => "start",
            PendingAction::Complete => "complete",
            PendingAction::Approve => "approve",
            PendingAction::Reject => "reject",
            PendingAction::Restart => "restart",
        }
    }

    pub fn all() -> [PendingAction; 5] {
        [
            PendingAction::Start,
            PendingAction::Complete,
            PendingAction::Approve,
            PendingAction::Reject,
            PendingAction::Restart,
        ]
    }

    pub fn source(&self) -> PendingStatus {
        match self {
            PendingAction::Start => PendingStatus::Open,
            PendingAction::Complete => PendingStatus::InProgress,
            PendingAction::Approve | PendingAction::Reject => PendingStatus::WaitingApproval,
            PendingAction::Restart => PendingStatus::Rejected,
        }
    }

    pub fn target(&self) -> PendingStatus {
        match self {
            PendingAction::Start | PendingAction::Restart => PendingStatus::InProgress,
            PendingAction::Complete => PendingStatus::WaitingApproval,
            PendingAction::Approve => PendingStatus::Resolved,
            PendingAction::Reject => PendingStatus::Rejected,
        }
    }
}

/// Input for creating a pending item
#[derive(Debug, Clone, PartialEq)]
pub struct NewPendingItem {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: NaiveDate,
    pub responsible: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
}

/// A tracked construction-site issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub responsible: String,
    pub deadline: NaiveDate,
    pub location: String,
    /// Encoded image data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    status: PendingStatus,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl PendingItem {
    /// Map a submitted form to a new `Open` record
    pub fn create(id: String, input: NewPendingItem, created_at: i64) -> DomainResult<Self> {
        let title = required(input.title, "title")?;
        let description = required(input.description, "description")?;

        Ok(Self {
            id,
            title,
            description,
            priority: input.priority,
            responsible: or_default(input.responsible, DEFAULT_RESPONSIBLE),
            deadline: input.deadline,
            location: or_default(input.location, DEFAULT_LOCATION),
            photo: input.photo.filter(|p| !p.is_empty()),
            status: PendingStatus::Open,
            created_at,
        })
    }

    pub fn status(&self) -> PendingStatus {
        self.status
    }

    pub fn perform(&mut self, action: PendingAction) -> DomainResult<PendingStatus> {
        self.status = self.status.apply(action)?;
        Ok(self.status)
    }

    pub fn start(&mut self) -> DomainResult<PendingStatus> {
        self.perform(PendingAction::Start)
    }

    pub fn complete(&mut self) -> DomainResult<PendingStatus> {
        self.perform(PendingAction::Complete)
    }

    pub fn approve(&mut self) -> DomainResult<PendingStatus> {
        self.perform(PendingAction::Approve)
    }

    pub fn reject(&mut self) -> DomainResult<PendingStatus> {
        self.perform(PendingAction::Reject)
    }

    pub fn restart(&mut self) -> DomainResult<PendingStatus> {
        self.perform(PendingAction::Restart)
    }
}

impl Entity for PendingItem {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Status filter for the pending list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PendingStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: PendingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Filter chips in display order: `All` first, then each status
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(StatusFilter::All)
            .chain(PendingStatus::all().into_iter().map(StatusFilter::Only))
            .collect()
    }
}

/// Matching items ordered by priority (high first), then deadline (earliest first).
///
/// The sort is stable, so items with equal keys keep their collection order.
pub fn list_pending(items: &[PendingItem], filter: StatusFilter) -> Vec<&PendingItem> {
    let mut matching: Vec<&PendingItem> = items
        .iter()
        .filter(|item| filter.matches(item.status))
        .collect();
    matching.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| a.deadline.cmp(&b.deadline))
    });
    matching
}

fn required(value: String, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
