//! Application Context
//!
//! UI-level state shared by the two modules: the active module and view, the
//! open forms, the transient notice and the draft handed over from deliveries.
//! Passed explicitly to every command.

use crate::domain::StatusFilter;
use crate::forms::{DeliveryForm, PendingForm, ReceiptForm};
use crate::suggest::SuggestionRequest;

/// Bottom-bar module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Module {
    #[default]
    Pending,
    Delivery,
}

/// Screen shown inside the active module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    PendingList,
    PendingForm,
    DeliveryList,
    DeliveryForm,
}

impl Module {
    pub fn list_view(&self) -> View {
        match self {
            Module::Pending => View::PendingList,
            Module::Delivery => View::DeliveryList,
        }
    }

    pub fn form_view(&self) -> View {
        match self {
            Module::Pending => View::PendingForm,
            Module::Delivery => View::DeliveryForm,
        }
    }
}

/// Transient message that hides itself at `expires_at` (epoch ms)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub expires_at: i64,
}

impl Notice {
    pub fn is_visible(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}

/// Not-yet-submitted pending item seeded from a delivery problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDraft {
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct UiContext {
    active_module: Module,
    view: View,
    pub status_filter: StatusFilter,
    pub pending_form: PendingForm,
    pub delivery_form: DeliveryForm,
    pub receipt: Option<ReceiptForm>,
    pub suggestion: SuggestionRequest,
    notice: Option<Notice>,
    draft: Option<PendingDraft>,
    alert: Option<String>,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_module(&self) -> Module {
        self.active_module
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Tab bar: show `module`'s list.
    ///
    /// Leaving a module discards its unsaved form state, and any suggestion
    /// still in flight for the pending form.
    pub fn switch_module(&mut self, module: Module) {
        if module != self.active_module {
            match self.active_module {
                Module::Pending => {
                    self.pending_form.reset();
                    self.suggestion.abandon();
                }
                Module::Delivery => {
                    self.delivery_form.reset();
                    self.receipt = None;
                }
            }
            self.active_module = module;
        }
        self.view = module.list_view();
    }

    /// Open the creation form of the active module.
    ///
    /// An unconsumed draft is applied to the pending form on the way in.
    pub fn open_form(&mut self) {
        self.view = self.active_module.form_view();
        if self.active_module == Module::Pending {
            if let Some(draft) = self.draft.take() {
                self.pending_form.apply_draft(&draft.description);
            }
        }
    }

    /// Leave the form without saving
    pub fn cancel_form(&mut self) {
        match self.active_module {
            Module::Pending => {
                self.pending_form.reset();
                self.suggestion.abandon();
            }
            Module::Delivery => self.delivery_form.reset(),
        }
        self.view = self.active_module.list_view();
    }

    /// Back to the list after a successful submit
    pub(crate) fn form_submitted(&mut self) {
        self.cancel_form();
    }

    pub fn show_notice(&mut self, message: impl Into<String>, now_ms: i64, duration_ms: i64) {
        self.notice = Some(Notice {
            message: message.into(),
            expires_at: now_ms + duration_ms,
        });
    }

    /// The notice, if still visible at `now_ms`
    pub fn notice(&self, now_ms: i64) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_visible(now_ms))
    }

    pub fn clear_expired_notice(&mut self, now_ms: i64) {
        if self.notice.as_ref().is_some_and(|n| !n.is_visible(now_ms)) {
            self.notice = None;
        }
    }

    /// Replace any unconsumed draft
    pub fn set_draft(&mut self, draft: PendingDraft) {
        self.draft = Some(draft);
    }

    pub fn draft(&self) -> Option<&PendingDraft> {
        self.draft.as_ref()
    }

    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// One-shot: the alert is cleared once taken
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
