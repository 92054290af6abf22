//! End-to-end session tests: one attached engine instance driven through
//! complete user journeys, with rendered links fed back in as the next
//! event the way a delegated click handler would feed them.

use pretty_assertions::assert_eq;
use pvs_core::feedback::{TEST_EMAIL_BODY, TEST_EMAIL_SUBJECT};
use pvs_core::{
    ContainerClick, DispatchOutcome, EscapeOutcome, InitialView, MailOutcome, SearchSession,
    SessionBackends, SingleOutcome, UiEvent,
};
use pvs_net::EndpointConfig;
use pvs_test_utils::{
    default_search_address, paper, results_page, FakeMailer, FakeSummaryBackend, FakeTransport,
};
use pvs_view::{collect_summary_links, MessageTone};
use std::sync::Arc;

struct Fakes {
    transport: Arc<FakeTransport>,
    summaries: Arc<FakeSummaryBackend>,
    mailer: Arc<FakeMailer>,
}

fn fixture_session() -> (SearchSession, Fakes) {
    let fakes = Fakes {
        transport: Arc::new(FakeTransport::new()),
        summaries: Arc::new(FakeSummaryBackend::new()),
        mailer: Arc::new(FakeMailer::new()),
    };
    let backends = SessionBackends {
        transport: fakes.transport.clone(),
        summaries: fakes.summaries.clone(),
        mailer: fakes.mailer.clone(),
    };
    let session = SearchSession::new(EndpointConfig::default(), backends, InitialView::new());
    (session, fakes)
}

/// Tenet: a complete journey accumulates consistent counters: one gate
/// permit per network flow, one cached summary, one history push, and no
/// permit left held at the end.
///
/// The detail step clicks a link the batch flow actually rendered, so the
/// panel markup and the link metadata extraction are exercised against
/// each other rather than against hand-built data.
#[tokio::test]
async fn full_journey_accumulates_consistent_counters() {
    let (session, fakes) = fixture_session();
    fakes.transport.stage_page(
        default_search_address("nlp", None),
        results_page(
            "nlp",
            1,
            1,
            &[
                paper("2403.1", "Tokenization Pitfalls", "Byte pairs bite back."),
                paper("2403.2", "Alignment Drift", "Goals wander over epochs."),
                paper("2403.3", "Eval Saturation", "Benchmarks wear out."),
            ],
        ),
    );

    let nav = session
        .dispatch(UiEvent::SearchSubmitted {
            query: "nlp".to_string(),
        })
        .await;
    assert!(matches!(nav, DispatchOutcome::Navigation(_)));

    session.dispatch(UiEvent::SummarizeTopClicked).await;
    let links = collect_summary_links(session.view().lock().panel().body());
    assert_eq!(links.len(), 3);

    let detail = session
        .dispatch(UiEvent::ResultsClick(ContainerClick::summary_link(
            links[1].clone(),
        )))
        .await;
    assert_eq!(detail, DispatchOutcome::Single(SingleOutcome::Rendered));
    assert_eq!(
        fakes.summaries.last_single_request().unwrap().title,
        "Alignment Drift"
    );

    let escape = session.dispatch(UiEvent::EscapePressed).await;
    assert_eq!(escape, DispatchOutcome::Escape(EscapeOutcome::ModalClosed));

    let stats = session.stats();
    assert_eq!(stats.gate.acquired_total, 3);
    assert_eq!(stats.gate.in_flight, 0);
    assert_eq!(stats.cache.entries, 1);
    assert_eq!(stats.cache.misses, 1);
    assert_eq!(stats.history_depth, 2);
    assert_eq!(stats.history_cursor, 1);
}

/// Tenet: a successful subscription reports the backend's message with a
/// success tone and clears the email field.
#[tokio::test]
async fn subscribe_success_reports_and_clears_field() {
    let (session, fakes) = fixture_session();

    let outcome = session
        .dispatch(UiEvent::SubscribeClicked {
            email: "reader@example.com".to_string(),
        })
        .await;

    assert_eq!(outcome, DispatchOutcome::Mail(MailOutcome::Accepted));
    assert_eq!(
        fakes.mailer.last_subscribe_email().as_deref(),
        Some("reader@example.com")
    );
    let view = session.view().lock();
    assert_eq!(
        view.feedback(),
        Some(("Subscribed reader@example.com.", MessageTone::Success))
    );
    assert_eq!(view.email_input(), "");
}

/// Tenet: a malformed address is rejected by local validation and the
/// mailing backend is never contacted.
#[tokio::test]
async fn invalid_email_never_reaches_mailer() {
    let (session, fakes) = fixture_session();

    let outcome = session
        .dispatch(UiEvent::SubscribeClicked {
            email: "not-an-email".to_string(),
        })
        .await;

    assert_eq!(outcome, DispatchOutcome::Mail(MailOutcome::Rejected));
    assert_eq!(fakes.mailer.subscribe_calls(), 0);
    assert_eq!(
        session.view().lock().validation_note(),
        Some("Please enter a valid email address.")
    );
}

/// Tenet: the test-send path carries its fixed subject and body and keeps
/// the typed address in the field.
#[tokio::test]
async fn test_send_keeps_field_and_fixed_content() {
    let (session, fakes) = fixture_session();

    let outcome = session
        .dispatch(UiEvent::TestSendClicked {
            email: "ops@example.com".to_string(),
        })
        .await;

    assert_eq!(outcome, DispatchOutcome::Mail(MailOutcome::Accepted));
    let request = fakes.mailer.last_test_request().unwrap();
    assert_eq!(request.email, "ops@example.com");
    assert_eq!(request.subject, TEST_EMAIL_SUBJECT);
    assert_eq!(request.body, TEST_EMAIL_BODY);
    assert_eq!(session.view().lock().email_input(), "ops@example.com");
}

/// Tenet: the close affordances close exactly their own surface.
#[tokio::test]
async fn close_clicks_close_their_surfaces() {
    let (session, fakes) = fixture_session();
    fakes.transport.stage_page(
        default_search_address("x", None),
        results_page("x", 1, 1, &[paper("1", "Only Paper", "Text.")]),
    );
    session
        .dispatch(UiEvent::SearchSubmitted {
            query: "x".to_string(),
        })
        .await;
    session.dispatch(UiEvent::SummarizeTopClicked).await;
    let links = collect_summary_links(session.view().lock().panel().body());
    session
        .dispatch(UiEvent::ResultsClick(ContainerClick::summary_link(
            links[0].clone(),
        )))
        .await;

    let modal = session.dispatch(UiEvent::ModalCloseClicked).await;
    assert_eq!(modal, DispatchOutcome::ModalClosed);
    {
        let view = session.view().lock();
        assert!(!view.modal().is_open());
        assert!(view.panel().is_open());
    }

    let panel = session.dispatch(UiEvent::PanelCloseClicked).await;
    assert_eq!(panel, DispatchOutcome::PanelClosed);
    assert!(!session.view().lock().panel().is_open());
}
