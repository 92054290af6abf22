//! Live page state
//!
//! `PageView` is the headless model of everything the engine may mutate on
//! the rendered page: region markup, the document title, the dedicated
//! message slots, the batch summary panel, the single-paper detail modal,
//! control disabled state, keyboard focus, and per-item abstract expansion.
//! Every handler receives the one live instance by reference; there is no
//! ambient page state anywhere else.
//!
//! All mutations are synchronous. Asynchronous flows mutate the view only
//! between suspension points, so no observer can see a half-applied change.

use crate::error::ViewError;
use crate::region::{RegionId, RegionSlot, CONTENT_REGION, RESULTS_REGION};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Interactive controls whose disabled and focus state the engine drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Search form submit button.
    SearchSubmit,
    /// The top-N summarize button.
    SummarizeTop,
    /// Close affordance of the summary panel.
    PanelClose,
    /// Close affordance in the modal header.
    ModalClose,
    /// Close affordance in the modal footer.
    ModalFooterClose,
    /// A per-paper summary link, keyed by paper identifier.
    PaperSummaryLink(String),
    /// Subscription form submit button.
    SubscribeSubmit,
    /// Administrative test-send button.
    TestSend,
}

/// Styling tone applied to subscription feedback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
    /// Neutral progress information.
    Info,
}

/// Batch summary panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryPanel {
    open: bool,
    body: String,
}

impl SummaryPanel {
    /// Whether the panel is currently visible.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current body markup.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Single-paper detail modal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailModal {
    open: bool,
    title: String,
    body: String,
    return_focus: Option<ControlId>,
}

impl DetailModal {
    /// Whether the modal is currently visible.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current heading text.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current body markup.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// The one live, mutable representation of the rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    title: String,
    regions: IndexMap<RegionId, RegionSlot>,
    message: Option<String>,
    validation_note: Option<String>,
    feedback: Option<(String, MessageTone)>,
    panel: SummaryPanel,
    modal: DetailModal,
    disabled: HashSet<ControlId>,
    focus: Option<ControlId>,
    expanded: HashSet<String>,
    email_input: String,
}

impl PageView {
    /// Creates a view with empty results and content regions.
    #[must_use]
    pub fn new() -> Self {
        let mut regions = IndexMap::new();
        regions.insert(RegionId::new(RESULTS_REGION), RegionSlot::default());
        regions.insert(RegionId::new(CONTENT_REGION), RegionSlot::default());
        Self {
            regions,
            ..Self::default()
        }
    }

    /// Seeds the results region with server-rendered markup.
    #[must_use]
    pub fn with_results_markup(mut self, markup: impl Into<String>) -> Self {
        if let Some(slot) = self.regions.get_mut(&RegionId::results()) {
            slot.replace(markup);
        }
        self
    }

    /// Seeds the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Current document title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Adopts a new document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Looks up a region slot.
    #[must_use]
    pub fn region(&self, id: &RegionId) -> Option<&RegionSlot> {
        self.regions.get(id)
    }

    /// Inner markup of the results region.
    #[must_use]
    pub fn results_markup(&self) -> &str {
        self.regions
            .get(&RegionId::results())
            .map(RegionSlot::markup)
            .unwrap_or_default()
    }

    /// Replaces a region's inner markup.
    ///
    /// Replacing the results region also resets per-item abstract expansion,
    /// since the items the expansion addressed no longer exist.
    ///
    /// # Errors
    /// Returns [`ViewError::UnknownRegion`] when the view has no such region.
    pub fn replace_region(
        &mut self,
        id: &RegionId,
        markup: impl Into<String>,
    ) -> Result<(), ViewError> {
        let slot = self
            .regions
            .get_mut(id)
            .ok_or_else(|| ViewError::unknown_region(id.as_str()))?;
        slot.replace(markup);
        if id.as_str() == RESULTS_REGION {
            self.expanded.clear();
        }
        Ok(())
    }

    /// Activates loading presentation on a region.
    ///
    /// # Errors
    /// Returns [`ViewError::UnknownRegion`] when the view has no such region.
    pub fn enter_region_loading(
        &mut self,
        id: &RegionId,
        placeholder: impl Into<String>,
    ) -> Result<(), ViewError> {
        let slot = self
            .regions
            .get_mut(id)
            .ok_or_else(|| ViewError::unknown_region(id.as_str()))?;
        slot.enter_loading(placeholder);
        if id.as_str() == RESULTS_REGION {
            self.expanded.clear();
        }
        Ok(())
    }

    /// Deactivates loading presentation on a region, if it exists.
    pub fn clear_region_loading(&mut self, id: &RegionId) {
        if let Some(slot) = self.regions.get_mut(id) {
            slot.clear_loading();
        }
    }

    /// Shows text in the dedicated search message slot.
    pub fn show_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
    }

    /// Hides the search message slot.
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Text currently in the search message slot.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Shows text in the email validation slot.
    pub fn show_validation_note(&mut self, text: impl Into<String>) {
        self.validation_note = Some(text.into());
    }

    /// Hides the email validation slot.
    pub fn clear_validation_note(&mut self) {
        self.validation_note = None;
    }

    /// Text currently in the email validation slot.
    #[must_use]
    pub fn validation_note(&self) -> Option<&str> {
        self.validation_note.as_deref()
    }

    /// Shows subscription feedback with a styling tone.
    pub fn show_feedback(&mut self, text: impl Into<String>, tone: MessageTone) {
        self.feedback = Some((text.into(), tone));
    }

    /// Hides the subscription feedback slot.
    pub fn hide_feedback(&mut self) {
        self.feedback = None;
    }

    /// Current subscription feedback, if visible.
    #[must_use]
    pub fn feedback(&self) -> Option<(&str, MessageTone)> {
        self.feedback.as_ref().map(|(text, tone)| (text.as_str(), *tone))
    }

    /// Records the text currently typed into the email field.
    pub fn set_email_input(&mut self, text: impl Into<String>) {
        self.email_input = text.into();
    }

    /// Empties the email field.
    pub fn clear_email_input(&mut self) {
        self.email_input.clear();
    }

    /// Text currently in the email field.
    #[must_use]
    pub fn email_input(&self) -> &str {
        &self.email_input
    }

    /// Disables a control.
    pub fn disable(&mut self, control: ControlId) {
        self.disabled.insert(control);
    }

    /// Re-enables a control.
    pub fn enable(&mut self, control: &ControlId) {
        self.disabled.remove(control);
    }

    /// Whether a control is disabled.
    #[must_use]
    pub fn is_disabled(&self, control: &ControlId) -> bool {
        self.disabled.contains(control)
    }

    /// Control currently holding keyboard focus.
    #[must_use]
    pub fn focus(&self) -> Option<&ControlId> {
        self.focus.as_ref()
    }

    /// Moves keyboard focus.
    pub fn set_focus(&mut self, control: ControlId) {
        self.focus = Some(control);
    }

    /// Summary panel state.
    #[inline]
    #[must_use]
    pub fn panel(&self) -> &SummaryPanel {
        &self.panel
    }

    /// Whether the summarize control should report an expanded panel.
    ///
    /// Mirrors panel visibility; the two are never allowed to diverge.
    #[must_use]
    pub fn panel_expanded(&self) -> bool {
        self.panel.open
    }

    /// Opens the summary panel and focuses its close affordance.
    pub fn open_panel(&mut self) {
        self.panel.open = true;
        self.focus = Some(ControlId::PanelClose);
    }

    /// Closes the summary panel and returns focus to the summarize control.
    pub fn close_panel(&mut self) {
        self.panel.open = false;
        self.focus = Some(ControlId::SummarizeTop);
    }

    /// Replaces the panel body markup.
    pub fn set_panel_body(&mut self, markup: impl Into<String>) {
        self.panel.body = markup.into();
    }

    /// Detail modal state.
    #[inline]
    #[must_use]
    pub fn modal(&self) -> &DetailModal {
        &self.modal
    }

    /// Opens the detail modal with a heading and body, remembering which
    /// control triggered it so focus can be restored on close.
    pub fn open_modal(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        opener: Option<ControlId>,
    ) {
        self.modal.open = true;
        self.modal.title = title.into();
        self.modal.body = body.into();
        if opener.is_some() {
            self.modal.return_focus = opener;
        }
        self.focus = Some(ControlId::ModalClose);
    }

    /// Replaces the modal body markup.
    pub fn set_modal_body(&mut self, markup: impl Into<String>) {
        self.modal.body = markup.into();
    }

    /// Closes the detail modal, restoring focus to the triggering control.
    pub fn close_modal(&mut self) {
        self.modal.open = false;
        if let Some(control) = self.modal.return_focus.take() {
            self.focus = Some(control);
        }
    }

    /// Marks a result item's abstract as expanded or collapsed.
    pub fn set_expanded(&mut self, paper_id: impl Into<String>, expanded: bool) {
        let id = paper_id.into();
        if expanded {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
    }

    /// Whether a result item's abstract is expanded.
    #[must_use]
    pub fn is_expanded(&self, paper_id: &str) -> bool {
        self.expanded.contains(paper_id)
    }
}
