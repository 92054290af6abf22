//! Scripted session harness
//!
//! Runs a parsed [`SessionScript`] against a live [`SearchSession`] and
//! reports one record per step. Steps that click rendered links (`page:`,
//! `detail:`) resolve their targets from the current view, the same way a
//! user can only click what is on screen.

pub mod demo;
pub mod script;

pub use demo::DemoBackend;
pub use script::{ScriptStep, SessionScript};

use crate::events::{ContainerClick, UiEvent};
use crate::feedback::MailOutcome;
use crate::session::{DispatchOutcome, SearchSession, SessionStats};
use crate::summary::{BatchOutcome, SingleOutcome};
use crate::sync::NavigateOutcome;
use pvs_view::{collect_page_links, collect_summary_links};
use url::Url;

/// What one script step did.
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// The step in its source form.
    pub label: String,
    /// Debug rendering of the dispatch outcome, or the reason the step
    /// could not be dispatched.
    pub outcome: String,
    /// Whether the step counts toward a passing run.
    pub ok: bool,
}

/// Full report from one scripted run.
#[derive(Debug, Clone)]
pub struct ScriptReport {
    /// One record per script step, in order.
    pub records: Vec<StepRecord>,
    /// Session counters after the last step.
    pub stats: SessionStats,
}

impl ScriptReport {
    /// Whether every step reached an expected outcome.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.records.iter().all(|record| record.ok)
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== PVS Session Report ===\n\n");
        report.push_str(&format!("Steps: {}\n", self.records.len()));
        for (i, record) in self.records.iter().enumerate() {
            let mark = if record.ok { "ok" } else { "failed" };
            report.push_str(&format!(
                "{}. [{}] {} -> {}\n",
                i + 1,
                mark,
                record.label,
                record.outcome
            ));
        }

        report.push_str(&format!(
            "\nGate: {} acquired, {} rejected, {} in flight\n",
            self.stats.gate.acquired_total,
            self.stats.gate.rejected_total,
            self.stats.gate.in_flight
        ));
        report.push_str(&format!(
            "Cache: {} entries, {} hits, {} misses\n",
            self.stats.cache.entries, self.stats.cache.hits, self.stats.cache.misses
        ));
        report.push_str(&format!(
            "History: depth {}, cursor {}\n",
            self.stats.history_depth, self.stats.history_cursor
        ));

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Runs every step of a script against the session, in order, and
/// collects the report.
pub async fn run_script(session: &SearchSession, script: &SessionScript) -> ScriptReport {
    let mut records = Vec::new();
    for step in script.steps() {
        let event = match resolve_step(session, step) {
            Ok(event) => event,
            Err(reason) => {
                records.push(StepRecord {
                    label: step.to_string(),
                    outcome: reason,
                    ok: false,
                });
                continue;
            }
        };
        let outcome = session.dispatch(event).await;
        records.push(StepRecord {
            label: step.to_string(),
            ok: step_ok(&outcome),
            outcome: format!("{outcome:?}"),
        });
    }
    ScriptReport {
        records,
        stats: session.stats(),
    }
}

/// Turns a step into the event it stands for. Steps that click rendered
/// links fail here when the view carries no such link.
fn resolve_step(session: &SearchSession, step: &ScriptStep) -> Result<UiEvent, String> {
    match step {
        ScriptStep::Search { query } => Ok(UiEvent::SearchSubmitted {
            query: query.clone(),
        }),
        ScriptStep::Page { number } => {
            let links = collect_page_links(session.view().lock().results_markup());
            links
                .into_iter()
                .find(|href| page_of(session.config().origin(), href) == Some(*number))
                .map(|href| UiEvent::ResultsClick(ContainerClick::page_link(href)))
                .ok_or_else(|| format!("no rendered pagination link for page {number}"))
        }
        ScriptStep::Summarize => Ok(UiEvent::SummarizeTopClicked),
        ScriptStep::Detail { ordinal } => {
            let links = collect_summary_links(session.view().lock().panel().body());
            ordinal
                .checked_sub(1)
                .and_then(|index| links.into_iter().nth(index))
                .map(|dataset| UiEvent::ResultsClick(ContainerClick::summary_link(dataset)))
                .ok_or_else(|| format!("no rendered summary link at position {ordinal}"))
        }
        ScriptStep::Back => Ok(UiEvent::HistoryBack),
        ScriptStep::Forward => Ok(UiEvent::HistoryForward),
        ScriptStep::Escape => Ok(UiEvent::EscapePressed),
        ScriptStep::ClosePanel => Ok(UiEvent::PanelCloseClicked),
        ScriptStep::CloseModal => Ok(UiEvent::ModalCloseClicked),
        ScriptStep::Subscribe { email } => Ok(UiEvent::SubscribeClicked {
            email: email.clone(),
        }),
        ScriptStep::TestSend { email } => Ok(UiEvent::TestSendClicked {
            email: email.clone(),
        }),
    }
}

fn page_of(origin: &Url, href: &str) -> Option<u32> {
    let address = Url::options().base_url(Some(origin)).parse(href).ok()?;
    address
        .query_pairs()
        .find(|(name, _)| name == "page")
        .and_then(|(_, value)| value.parse().ok())
}

fn step_ok(outcome: &DispatchOutcome) -> bool {
    match outcome {
        DispatchOutcome::Navigation(nav) => {
            matches!(
                nav,
                NavigateOutcome::Updated { .. } | NavigateOutcome::Skipped
            )
        }
        DispatchOutcome::Batch(batch) => {
            matches!(
                batch,
                BatchOutcome::Rendered { .. } | BatchOutcome::NothingToSummarize
            )
        }
        DispatchOutcome::Single(single) => {
            matches!(single, SingleOutcome::Rendered | SingleOutcome::CacheHit)
        }
        DispatchOutcome::Mail(mail) => matches!(mail, MailOutcome::Accepted),
        DispatchOutcome::Escape(_)
        | DispatchOutcome::PanelClosed
        | DispatchOutcome::ModalClosed
        | DispatchOutcome::ExpansionChanged { .. } => true,
        DispatchOutcome::Unhandled => false,
    }
}
