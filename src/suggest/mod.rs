//! Image Suggestion
//!
//! Turns a site photo into a suggested issue title, description and priority.
//! The analyzer sits behind [`ImageAnalyzer`]; [`SuggestionRequest`] tracks the
//! one outstanding request a form may have.

mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Priority;

pub use gemini::GeminiClient;

/// Instruction sent along with every image
pub const ANALYSIS_PROMPT: &str = "Analyze this image from a construction site. \
Identify the potential defect or task. Provide a short title, a detailed description \
of the issue, and suggest a priority level.";

/// Suggested titles are cut to this many characters
pub const MAX_TITLE_CHARS: usize = 50;

/// Structured answer from the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    #[error("Image analysis not configured: {0}")]
    NotConfigured(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Image analysis returned no answer")]
    EmptyResponse,
    #[error("Malformed suggestion: {0}")]
    Malformed(String),
}

impl SuggestError {
    /// One-shot message shown to the user; the form is left untouched
    pub fn user_message(&self) -> &'static str {
        match self {
            SuggestError::NotConfigured(_) => "Image analysis is not available on this device.",
            _ => "Could not analyze the image. Check your connection and try again.",
        }
    }
}

/// Client for the external image-understanding service
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Analyze one encoded image (raw base64 or a `data:` URL)
    async fn analyze(&self, image: &str) -> Result<Suggestion, SuggestError>;
}

#[derive(Deserialize)]
struct RawSuggestion {
    title: String,
    description: String,
    priority: String,
}

/// Parse the JSON document the service answers with
pub fn parse_suggestion(text: &str) -> Result<Suggestion, SuggestError> {
    let raw: RawSuggestion =
        serde_json::from_str(text.trim()).map_err(|e| SuggestError::Malformed(e.to_string()))?;

    let priority = Priority::parse(&raw.priority)
        .ok_or_else(|| SuggestError::Malformed(format!("unknown priority {:?}", raw.priority)))?;
    let title: String = raw.title.trim().chars().take(MAX_TITLE_CHARS).collect();
    let title = title.trim_end().to_string();
    if title.is_empty() {
        return Err(SuggestError::Malformed("empty title".to_string()));
    }

    Ok(Suggestion {
        title,
        description: raw.description.trim().to_string(),
        priority,
    })
}

/// Base64 payload of an image, without any `data:...;base64,` prefix
pub fn strip_data_url(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => payload,
        _ => image,
    }
}

/// Handle for one outstanding request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTicket {
    id: u64,
    pub image: String,
}

/// Lifecycle of the suggestion request attached to a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    #[default]
    Idle,
    InFlight,
    Settled(Result<Suggestion, SuggestError>),
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionRequest {
    state: SuggestionState,
    current: Option<u64>,
    next_ticket: u64,
}

impl SuggestionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// While true the "analyze" action must stay disabled
    pub fn is_in_flight(&self) -> bool {
        self.state == SuggestionState::InFlight
    }

    /// Start a request for `image`; `None` if one is already in flight
    pub fn begin(&mut self, image: &str) -> Option<SuggestionTicket> {
        if self.is_in_flight() {
            return None;
        }
        self.next_ticket += 1;
        self.current = Some(self.next_ticket);
        self.state = SuggestionState::InFlight;
        Some(SuggestionTicket {
            id: self.next_ticket,
            image: image.to_string(),
        })
    }

    /// Record the outcome of `ticket`.
    ///
    /// Returns false and drops the outcome when the ticket is no longer the
    /// outstanding one (the form was reset or discarded meanwhile).
    pub fn settle(
        &mut self,
        ticket: &SuggestionTicket,
        outcome: Result<Suggestion, SuggestError>,
    ) -> bool {
        if self.current != Some(ticket.id) {
            return false;
        }
        self.current = None;
        self.state = SuggestionState::Settled(outcome);
        true
    }

    /// Forget any outstanding request; its result will be discarded
    pub fn abandon(&mut self) {
        self.current = None;
        self.state = SuggestionState::Idle;
    }

    /// Take a settled outcome for display, returning to idle
    pub fn acknowledge(&mut self) -> Option<Result<Suggestion, SuggestError>> {
        match std::mem::take(&mut self.state) {
            SuggestionState::Settled(outcome) => Some(outcome),
            other => {
                self.state = other;
                None
            }
        }
    }
}
