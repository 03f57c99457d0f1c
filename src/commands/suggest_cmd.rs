//! Suggestion Commands
//!
//! Analyze the photo attached to the pending form and fill title, description
//! and priority from the answer. A failure raises an alert and leaves the form
//! as it was.

use crate::domain::{DomainError, DomainResult};
use crate::suggest::{SuggestError, Suggestion, SuggestionTicket};
use crate::AppState;

/// Start analyzing the attached photo.
///
/// `Ok(None)` while a previous request is still in flight.
pub fn begin_suggestion(state: &mut AppState) -> DomainResult<Option<SuggestionTicket>> {
    let photo = state
        .ui
        .pending_form
        .photo()
        .ok_or_else(|| DomainError::InvalidInput("attach a photo first".to_string()))?
        .to_string();

    Ok(state.ui.suggestion.begin(&photo))
}

/// Apply the outcome of `ticket`. Returns false if the form moved on meanwhile.
pub fn finish_suggestion(
    state: &mut AppState,
    ticket: &SuggestionTicket,
    outcome: Result<Suggestion, SuggestError>,
) -> bool {
    if !state.ui.suggestion.settle(ticket, outcome) {
        log::debug!("Dropping stale suggestion result");
        return false;
    }

    match state.ui.suggestion.acknowledge() {
        Some(Ok(suggestion)) => {
            state.ui.pending_form.apply_suggestion(&suggestion);
            log::info!("Applied image suggestion: {}", suggestion.title);
        }
        Some(Err(e)) => {
            log::error!("Image analysis failed: {}", e);
            state.ui.raise_alert(e.user_message());
        }
        None => {}
    }
    true
}

/// Run a full analysis of the attached photo with the configured analyzer
pub async fn analyze_photo(state: &mut AppState) -> DomainResult<bool> {
    let Some(ticket) = begin_suggestion(state)? else {
        return Ok(false);
    };

    let outcome = match state.analyzer() {
        Some(analyzer) => analyzer.analyze(&ticket.image).await,
        None => Err(SuggestError::NotConfigured("no analyzer".to_string())),
    };
    Ok(finish_suggestion(state, &ticket, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::test_app;
    use crate::context::Module;
    use crate::domain::Priority;
    use crate::suggest::ImageAnalyzer;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedAnalyzer(Result<Suggestion, SuggestError>);

    #[async_trait]
    impl ImageAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _image: &str) -> Result<Suggestion, SuggestError> {
            self.0.clone()
        }
    }

    fn cracked_beam() -> Suggestion {
        Suggestion {
            title: "Cracked beam".to_string(),
            description: "Diagonal crack near the support".to_string(),
            priority: Priority::High,
        }
    }

    #[tokio::test]
    async fn test_analyze_fills_form() {
        let app = test_app().await;
        let mut state = app.state.with_analyzer(Arc::new(FixedAnalyzer(Ok(cracked_beam()))));
        state.ui.open_form();
        state.ui.pending_form.attach_photo("data:image/jpeg;base64,QUJD");

        assert!(analyze_photo(&mut state).await.unwrap());
        assert_eq!(state.ui.pending_form.title, "Cracked beam");
        assert_eq!(state.ui.pending_form.priority, Priority::High);
        assert!(!state.ui.suggestion.is_in_flight());
    }

    #[tokio::test]
    async fn test_analyze_failure_leaves_form_untouched() {
        let app = test_app().await;
        let mut state = app
            .state
            .with_analyzer(Arc::new(FixedAnalyzer(Err(SuggestError::Transport("timeout".to_string())))));
        state.ui.open_form();
        state.ui.pending_form.title = "My title".to_string();
        state.ui.pending_form.attach_photo("QUJD");
        let before = state.ui.pending_form.clone();

        assert!(analyze_photo(&mut state).await.unwrap());
        assert_eq!(state.ui.pending_form, before);
        assert!(state.ui.take_alert().is_some());
        assert!(state.ui.take_alert().is_none());
    }

    #[tokio::test]
    async fn test_missing_analyzer_raises_alert() {
        let mut app = test_app().await;
        app.state.ui.open_form();
        app.state.ui.pending_form.attach_photo("QUJD");

        assert!(analyze_photo(&mut app.state).await.unwrap());
        assert_eq!(
            app.state.ui.take_alert().as_deref(),
            Some("Image analysis is not available on this device.")
        );
    }

    #[tokio::test]
    async fn test_begin_requires_photo_and_refuses_resubmission() {
        let mut app = test_app().await;
        app.state.ui.open_form();
        assert!(matches!(begin_suggestion(&mut app.state), Err(DomainError::InvalidInput(_))));

        app.state.ui.pending_form.attach_photo("QUJD");
        let ticket = begin_suggestion(&mut app.state).unwrap().unwrap();
        assert!(begin_suggestion(&mut app.state).unwrap().is_none());

        assert!(finish_suggestion(&mut app.state, &ticket, Ok(cracked_beam())));
        assert!(begin_suggestion(&mut app.state).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_result_after_leaving_form_is_dropped() {
        let mut app = test_app().await;
        app.state.ui.open_form();
        app.state.ui.pending_form.attach_photo("QUJD");
        let ticket = begin_suggestion(&mut app.state).unwrap().unwrap();

        app.state.ui.switch_module(Module::Delivery);
        assert!(!finish_suggestion(&mut app.state, &ticket, Ok(cracked_beam())));
        assert!(app.state.ui.pending_form.title.is_empty());
    }
}
