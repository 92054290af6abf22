//! Subscription form flows
//!
//! The email form runs outside the shared request gate: its two actions
//! (subscribe and admin test-send) share a dual-button disable guard
//! scoped to the form itself. Validation happens before any network
//! traffic, and the backend's own `message` always wins over the
//! built-in fallback text.

use crate::SharedView;
use pvs_net::{MailingBackend, TestEmailRequest};
use pvs_view::{ControlId, MessageTone};
use regex::Regex;
use std::sync::Arc;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Subject line for the admin test-send action.
pub const TEST_EMAIL_SUBJECT: &str = "Test Email from Frontend";

/// Body for the admin test-send action.
pub const TEST_EMAIL_BODY: &str =
    "<h1>Test Email</h1><p>This is a test email sent from the frontend test button.</p>";

const EMPTY_EMAIL_NOTE: &str = "Email address is required.";
const INVALID_EMAIL_NOTE: &str = "Please enter a valid email address.";
const SUBSCRIBE_SUCCESS_FALLBACK: &str =
    "Subscription successful! Please check your email to confirm.";
const SUBSCRIBE_FAILURE_FALLBACK: &str = "Subscription failed. Please try again.";
const SUBSCRIBE_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";
const TEST_SEND_FAILURE_FALLBACK: &str = "Failed to send test email. Please try again.";
const TEST_SEND_ERROR_MESSAGE: &str =
    "An unexpected error occurred while sending test email. Please try again later.";

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,4}$").expect("email regex must compile")
    })
}

/// Terminal result of a subscription form action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailOutcome {
    /// The backend accepted the request; success feedback was rendered.
    Accepted,
    /// The address failed validation; no request was made.
    Rejected,
    /// The backend refused or the request failed; error feedback was
    /// rendered.
    Failed,
    /// A form action was already in flight; the trigger was dropped.
    Ignored,
}

/// Drives the subscribe and test-send actions against the shared view.
pub struct FeedbackFormController {
    view: SharedView,
    mailer: Arc<dyn MailingBackend>,
}

impl FeedbackFormController {
    /// Creates a controller over the shared view and mailing backend.
    #[must_use]
    pub fn new(view: SharedView, mailer: Arc<dyn MailingBackend>) -> Self {
        Self { view, mailer }
    }

    /// Submits a subscription for the given address. On success the
    /// backend message (or the built-in fallback) is shown with success
    /// styling and the email field is cleared; refusals and failures
    /// show error styling and keep the field.
    pub async fn subscribe(&self, raw_email: &str) -> MailOutcome {
        let email = match self.prepare(raw_email) {
            Ok(email) => email,
            Err(outcome) => return outcome,
        };

        let outcome = match self.mailer.subscribe(&email).await {
            Ok(result) if result.ok => {
                info!(email, "subscription accepted");
                let mut view = self.view.lock();
                view.show_feedback(
                    result
                        .message
                        .unwrap_or_else(|| SUBSCRIBE_SUCCESS_FALLBACK.to_string()),
                    MessageTone::Success,
                );
                view.clear_email_input();
                MailOutcome::Accepted
            }
            Ok(result) => {
                warn!(email, "subscription refused");
                self.view.lock().show_feedback(
                    result
                        .message
                        .unwrap_or_else(|| SUBSCRIBE_FAILURE_FALLBACK.to_string()),
                    MessageTone::Error,
                );
                MailOutcome::Failed
            }
            Err(error) => {
                warn!(%error, "subscription request failed");
                self.view
                    .lock()
                    .show_feedback(SUBSCRIBE_ERROR_MESSAGE, MessageTone::Error);
                MailOutcome::Failed
            }
        };

        self.release();
        outcome
    }

    /// Sends the canned test email to the given address. The request
    /// carries the fixed subject and body; the rendered feedback follows
    /// the same message-or-fallback rule as [`subscribe`](Self::subscribe)
    /// but never clears the field.
    pub async fn send_test_email(&self, raw_email: &str) -> MailOutcome {
        let email = match self.prepare(raw_email) {
            Ok(email) => email,
            Err(outcome) => return outcome,
        };

        let request = TestEmailRequest {
            email: email.clone(),
            subject: TEST_EMAIL_SUBJECT.to_string(),
            body: TEST_EMAIL_BODY.to_string(),
        };
        let outcome = match self.mailer.send_test_email(&request).await {
            Ok(result) if result.ok => {
                info!(email, "test email sent");
                self.view.lock().show_feedback(
                    result
                        .message
                        .unwrap_or_else(|| format!("Test email sent to {email}.")),
                    MessageTone::Success,
                );
                MailOutcome::Accepted
            }
            Ok(result) => {
                warn!(email, "test email refused");
                self.view.lock().show_feedback(
                    result
                        .message
                        .unwrap_or_else(|| TEST_SEND_FAILURE_FALLBACK.to_string()),
                    MessageTone::Error,
                );
                MailOutcome::Failed
            }
            Err(error) => {
                warn!(%error, "test email request failed");
                self.view
                    .lock()
                    .show_feedback(TEST_SEND_ERROR_MESSAGE, MessageTone::Error);
                MailOutcome::Failed
            }
        };

        self.release();
        outcome
    }

    /// Checks the in-flight guard, hides stale feedback, validates the
    /// address, and disables both buttons. Yields the terminal outcome
    /// when the action must not proceed.
    fn prepare(&self, raw_email: &str) -> Result<String, MailOutcome> {
        let mut view = self.view.lock();
        if view.is_disabled(&ControlId::SubscribeSubmit) || view.is_disabled(&ControlId::TestSend)
        {
            debug!("form action already in flight; trigger dropped");
            return Err(MailOutcome::Ignored);
        }
        view.hide_feedback();
        view.set_email_input(raw_email);

        let email = raw_email.trim();
        if email.is_empty() {
            view.show_validation_note(EMPTY_EMAIL_NOTE);
            return Err(MailOutcome::Rejected);
        }
        if !email_re().is_match(email) {
            debug!(email, "address failed validation");
            view.show_validation_note(INVALID_EMAIL_NOTE);
            return Err(MailOutcome::Rejected);
        }
        view.clear_validation_note();

        view.disable(ControlId::SubscribeSubmit);
        view.disable(ControlId::TestSend);
        Ok(email.to_string())
    }

    fn release(&self) {
        let mut view = self.view.lock();
        view.enable(&ControlId::SubscribeSubmit);
        view.enable(&ControlId::TestSend);
    }
}
