use std::sync::Arc;

use anyhow::Context;

use psycanvas::api::{ApiClient, DrawingFile};
use psycanvas::config::ClientConfig;
use psycanvas::questionnaire::QuestionnaireAnswers;
use psycanvas::render::render;
use psycanvas::report::poller::{PollPolicy, ReportPoller};
use psycanvas::report::{HttpReportFetcher, ReportState, synthesize};
use psycanvas::wizard::Wizard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("Usage: psycanvas <house.png> <animal.png> <portrait.png> [answers.json]");
        std::process::exit(2);
    }

    let config = ClientConfig::from_env();

    eprintln!("🎨 PsyCanvas v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.base_url);
    eprintln!(
        "   Polling: every {}s, fallback {}\n",
        config.poll_interval.as_secs(),
        if config.fallback_enabled { "on" } else { "off" },
    );

    let api = ApiClient::new(config.base_url.clone());
    let mut wizard = Wizard::new();

    // ── Step 1: upload drawings ──────────────────────────────────────────
    let mut drawings = Vec::with_capacity(3);
    for path in &args[..3] {
        let bytes = std::fs::read(path).with_context(|| format!("cannot read {path}"))?;
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("drawing.png")
            .to_string();
        drawings.push(DrawingFile::new(file_name, bytes));
    }
    let (portrait, animal, house) = (
        drawings.pop().expect("three drawings"),
        drawings.pop().expect("three drawings"),
        drawings.pop().expect("three drawings"),
    );

    let job_id = {
        let _busy = wizard.begin_busy();
        api.upload_drawings(house, animal, portrait)
            .await
            .context("drawing upload failed")?
    };
    wizard.complete_upload(job_id.clone())?;
    eprintln!("   Job: {job_id}");

    // ── Step 2: questionnaire ────────────────────────────────────────────
    let answers = match args.get(3) {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
            let answers: QuestionnaireAnswers =
                serde_json::from_str(&raw).context("invalid answers file")?;
            let _busy = wizard.begin_busy();
            api.submit_survey(&job_id, &answers)
                .await
                .context("survey submission failed")?;
            Some(answers)
        }
        None => {
            eprintln!("   No answers file; questionnaire step skipped");
            None
        }
    };
    wizard.complete_questionnaire(answers)?;

    // ── Step 3: report ───────────────────────────────────────────────────
    let analysis = Arc::new(synthesize(wizard.answers()));
    let fetcher = Arc::new(HttpReportFetcher::new(
        config.base_url.clone(),
        Arc::clone(&analysis),
    ));
    let poller = ReportPoller::activate(
        PollPolicy::from(&config),
        fetcher,
        job_id,
        analysis,
    );

    let mut state_rx = poller.subscribe();
    let terminal = loop {
        let state = state_rx.borrow_and_update().clone();
        if state.is_terminal() {
            break state;
        }
        eprintln!("   {}", render(&state));
        state_rx.changed().await?;
    };

    println!("{}", render(&terminal));
    if matches!(terminal, ReportState::Error { .. }) {
        std::process::exit(1);
    }

    Ok(())
}
