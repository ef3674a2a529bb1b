//! End-to-end tests for the report polling loop over real HTTP.
//!
//! Each test boots an axum stub server on a random port with a scripted
//! sequence of status responses, then drives the real `HttpReportFetcher`
//! through a `ReportPoller` against it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::timeout;

use psycanvas::report::poller::{PollPolicy, ReportPoller};
use psycanvas::report::{HttpReportFetcher, ReportState, synthesize};

/// Maximum time any test waits on a state change.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct StubState {
    script: Arc<Mutex<VecDeque<(u16, Value)>>>,
    repeat: (u16, Value),
    hits: Arc<AtomicU32>,
}

async fn report_status(
    State(state): State<StubState>,
    Path(_task_id): Path<String>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::Relaxed);
    let (status, body) = state
        .script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| state.repeat.clone());
    (
        StatusCode::from_u16(status).expect("valid status in script"),
        Json(body),
    )
}

/// Start the stub backend; returns its base URL and request counter.
async fn start_stub(
    script: Vec<(u16, Value)>,
    repeat: (u16, Value),
) -> (String, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let state = StubState {
        script: Arc::new(Mutex::new(script.into())),
        repeat,
        hits: Arc::clone(&hits),
    };
    let app = Router::new()
        .route("/report/{task_id}", get(report_status))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{addr}"), hits)
}

fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(25),
        max_unavailable_attempts: 3,
        fallback_enabled: true,
    }
}

fn start_poller(base_url: &str, policy: PollPolicy) -> (ReportPoller, watch::Receiver<ReportState>) {
    let analysis = Arc::new(synthesize(None));
    let fetcher = Arc::new(HttpReportFetcher::new(base_url, Arc::clone(&analysis)));
    let poller = ReportPoller::activate(policy, fetcher, "abc123", analysis);
    let rx = poller.subscribe();
    (poller, rx)
}

async fn wait_terminal(rx: &mut watch::Receiver<ReportState>) -> ReportState {
    timeout(TEST_TIMEOUT, async {
        loop {
            {
                let state = rx.borrow().clone();
                if state.is_terminal() {
                    return state;
                }
            }
            rx.changed().await.expect("state sender dropped");
        }
    })
    .await
    .expect("timed out waiting for a terminal report state")
}

#[tokio::test]
async fn three_404s_produce_a_synthesized_report() {
    let (base_url, hits) = start_stub(vec![], (404, json!({"detail": "not found"}))).await;
    let (_poller, mut rx) = start_poller(&base_url, fast_policy());

    let state = wait_terminal(&mut rx).await;
    match state {
        ReportState::Ready { analysis, pdf_url } => {
            assert!(pdf_url.is_none(), "fallback carries no download reference");
            assert_eq!(analysis.scores.emotional_stability, 14);
        }
        other => panic!("expected synthesized Ready, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::Relaxed), 3);

    // Terminal state: the stub must see no further requests.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(hits.load(Ordering::Relaxed), 3);
}

#[tokio::test]
async fn server_errors_count_toward_fallback_like_404s() {
    let script = vec![
        (500, json!({"detail": "boom"})),
        (503, json!({"detail": "maintenance"})),
        (404, json!({"detail": "gone"})),
    ];
    let (base_url, hits) = start_stub(script, (404, json!({}))).await;
    let (_poller, mut rx) = start_poller(&base_url, fast_policy());

    let state = wait_terminal(&mut rx).await;
    assert!(state.is_ready());
    assert_eq!(hits.load(Ordering::Relaxed), 3);
}

#[tokio::test]
async fn http_400_is_fatal_on_the_first_attempt() {
    let (base_url, hits) = start_stub(vec![], (400, json!({"detail": "bad task id"}))).await;
    let (poller, mut rx) = start_poller(&base_url, fast_policy());

    let state = wait_terminal(&mut rx).await;
    match state {
        ReportState::Error { message } => {
            assert!(message.contains("400"), "message built from status: {message}");
            assert!(message.contains("bad task id"), "message carries body: {message}");
        }
        other => panic!("expected Error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::Relaxed), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        hits.load(Ordering::Relaxed),
        1,
        "no polling after a fatal error until an explicit retry"
    );

    poller.retry().expect("retry from error");
    let state = wait_terminal(&mut rx).await;
    assert!(state.is_error(), "stub still answers 400");
    assert_eq!(hits.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn processing_then_ready_uses_local_analysis() {
    let script = vec![
        (200, json!({"status": "processing"})),
        (200, json!({"status": "processing"})),
        (
            200,
            json!({
                "status": "ready",
                "pdf_url": "https://backend/report.pdf",
                // Whatever analysis the backend supplies is discarded.
                "analysis": {"scores": {"emotionalStability": 999}},
            }),
        ),
    ];
    let (base_url, hits) = start_stub(script, (200, json!({"status": "ready"}))).await;
    let (_poller, mut rx) = start_poller(&base_url, fast_policy());

    let state = wait_terminal(&mut rx).await;
    match state {
        ReportState::Ready { analysis, pdf_url } => {
            assert_eq!(pdf_url.as_deref(), Some("https://backend/report.pdf"));
            assert_eq!(
                analysis.scores.emotional_stability, 14,
                "synthesized result wins over the backend payload"
            );
        }
        other => panic!("expected Ready, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::Relaxed), 3);
}

#[tokio::test]
async fn declared_error_status_keeps_polling() {
    let script = vec![
        (200, json!({"status": "error", "message": "transient"})),
        (200, json!({"status": "ready"})),
    ];
    let (base_url, hits) = start_stub(script, (200, json!({"status": "ready"}))).await;
    let (_poller, mut rx) = start_poller(&base_url, fast_policy());

    let state = wait_terminal(&mut rx).await;
    assert!(state.is_ready());
    assert_eq!(hits.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn malformed_success_body_is_fatal() {
    let (base_url, hits) = start_stub(vec![], (200, json!("not an object"))).await;
    let (_poller, mut rx) = start_poller(&base_url, fast_policy());

    let state = wait_terminal(&mut rx).await;
    match state {
        ReportState::Error { message } => {
            assert!(message.contains("Malformed"), "got: {message}");
        }
        other => panic!("expected Error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn fallback_disabled_outlasts_an_unavailable_backend() {
    let script = vec![
        (404, json!({})),
        (404, json!({})),
        (404, json!({})),
        (404, json!({})),
        (200, json!({"status": "ready"})),
    ];
    let (base_url, hits) = start_stub(script, (200, json!({"status": "ready"}))).await;
    let policy = PollPolicy {
        fallback_enabled: false,
        ..fast_policy()
    };
    let (_poller, mut rx) = start_poller(&base_url, policy);

    let state = wait_terminal(&mut rx).await;
    assert!(state.is_ready());
    assert_eq!(
        hits.load(Ordering::Relaxed),
        5,
        "four unavailable attempts absorbed without fallback"
    );
}
