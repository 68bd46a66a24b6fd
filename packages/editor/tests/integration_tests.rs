//! Integration tests for the editor crate

use adork_playground_common::{
    ConversionOutcome, EngineSlot, RenderKind, RenderState, StaticConverter, DEFAULT_SOURCE,
};
use adork_playground_editor::{EditSession, Pipeline, PipelineConfig, RunOutcome, TimestampPolicy};
use adork_playground_formatter::{FormatOptions, FormatResult, Formatter, HtmlFormatter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use tokio::sync::oneshot;

/// Stand-in engine: paragraphs, `*bold*` spans, and an error for unbalanced markers
fn asciidoc_engine() -> EngineSlot {
    EngineSlot::loaded(StaticConverter::new(|source: &str, _| {
        if source.matches('*').count() % 2 == 1 {
            return ConversionOutcome::failure(["unterminated bold marker at line 1"]);
        }
        let mut html = String::from(r#"<div class="paragraph"><p>"#);
        for (i, part) in source.split('*').enumerate() {
            if i % 2 == 1 {
                html.push_str(&format!("<strong>{part}</strong>"));
            } else {
                html.push_str(part);
            }
        }
        html.push_str("</p></div>");
        ConversionOutcome::success(html)
    }))
}

#[derive(Default)]
struct CountingFormatter {
    calls: AtomicUsize,
}

#[async_trait]
impl Formatter for CountingFormatter {
    async fn format(&self, markup: &str, options: &FormatOptions) -> FormatResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        HtmlFormatter.format(markup, options).await
    }
}

struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Blocks formatting of specific markup until the test releases it
#[derive(Default)]
struct GatedFormatter {
    gates: Mutex<HashMap<String, Gate>>,
}

impl GatedFormatter {
    fn hold(&self, markup: &str) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(
            markup.to_string(),
            Gate {
                entered: entered_tx,
                release: release_rx,
            },
        );
        (entered_rx, release_tx)
    }
}

#[async_trait]
impl Formatter for GatedFormatter {
    async fn format(&self, markup: &str, options: &FormatOptions) -> FormatResult<String> {
        let gate = {
            let mut gates = self.gates.lock().unwrap();
            gates.remove(markup)
        };
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }
        HtmlFormatter.format(markup, options).await
    }
}

fn session_with(engine: EngineSlot, formatter: Arc<dyn Formatter>) -> EditSession {
    let config = PipelineConfig {
        timestamp: TimestampPolicy::None,
        ..PipelineConfig::default()
    };
    EditSession::new(Pipeline::new(engine, formatter, config))
}

#[tokio::test]
async fn test_greeting_renders_pretty_html() -> anyhow::Result<()> {
    let mut session = session_with(asciidoc_engine(), Arc::new(HtmlFormatter));

    session.edit(DEFAULT_SOURCE).await?;

    let state = session.render_state();
    assert!(!state.is_error());
    assert_eq!(state.kind(), RenderKind::Formatted);
    assert_eq!(
        state.content(),
        "<div class=\"paragraph\">\n  <p>Hello, <strong>AsciiDork!</strong></p>\n</div>\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_conversion_failure_skips_formatter() -> anyhow::Result<()> {
    let formatter = Arc::new(CountingFormatter::default());
    let mut session = session_with(asciidoc_engine(), formatter.clone());

    session.edit("Hello, *AsciiDork!").await?;

    let state = session.render_state();
    assert!(state.is_error());
    assert_eq!(state.kind(), RenderKind::ConversionFailed);
    assert_eq!(state.content(), "unterminated bold marker at line 1");
    assert_eq!(formatter.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_formatter_rejection_is_shown() -> anyhow::Result<()> {
    let engine = EngineSlot::loaded(StaticConverter::new(|_: &str, _| {
        ConversionOutcome::success("<unclosed")
    }));
    let mut session = session_with(engine, Arc::new(HtmlFormatter));

    session.edit("anything").await?;

    let state = session.render_state();
    assert!(state.is_error());
    assert_eq!(state.kind(), RenderKind::FormatFailed);
    assert_eq!(
        state.content(),
        "unexpected end of input in tag `<unclosed` (1:1)"
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_engine_keeps_initial_state() -> anyhow::Result<()> {
    let mut session = session_with(EngineSlot::empty(), Arc::new(HtmlFormatter));

    let outcome = session.edit(DEFAULT_SOURCE).await?;

    assert_eq!(outcome, RunOutcome::EngineUnavailable);
    assert_eq!(session.render_state(), RenderState::default());
    assert!(!session.render_state().is_error());
    Ok(())
}

#[tokio::test]
async fn test_slow_run_never_overwrites_newer_edit() -> anyhow::Result<()> {
    let formatter = Arc::new(GatedFormatter::default());
    let (entered, release) = formatter.hold(r#"<div class="paragraph"><p>a</p></div>"#);
    let mut session = session_with(asciidoc_engine(), formatter.clone());

    let first = session.set_source("a");
    entered.await?;

    let second = session.edit("ab").await?;
    let third = session.edit("abc").await?;
    assert!(matches!(second, RunOutcome::Applied(_)));
    assert!(matches!(third, RunOutcome::Applied(_)));

    let _ = release.send(());
    let first = first.await?;

    assert!(matches!(first, RunOutcome::Superseded(_)));
    assert_eq!(
        session.render_state().content(),
        "<div class=\"paragraph\">\n  <p>abc</p>\n</div>\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_newer_run_completing_first_wins() -> anyhow::Result<()> {
    let formatter = Arc::new(GatedFormatter::default());
    let (entered, release) = formatter.hold(r#"<div class="paragraph"><p>old</p></div>"#);
    let pipeline = Pipeline::new(asciidoc_engine(), formatter.clone(), PipelineConfig::default());
    let mut updates = pipeline.subscribe();

    let slow = {
        let pipeline = pipeline.clone();
        let ticket = pipeline.begin();
        tokio::spawn(async move { pipeline.run_ticket(ticket, "old").await })
    };
    entered.await?;

    pipeline.run("new").await;
    updates.changed().await?;
    let _ = release.send(());
    slow.await?;

    assert!(!updates.has_changed()?);
    assert_eq!(
        pipeline.state().content(),
        "<div class=\"paragraph\">\n  <p>new</p>\n</div>\n"
    );
    Ok(())
}

/// Rendezvous with a converter blocked on `gate`
async fn meet(gate: &Arc<Barrier>) -> anyhow::Result<()> {
    let gate = gate.clone();
    tokio::task::spawn_blocking(move || {
        gate.wait();
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_run_superseded_during_conversion_skips_formatter() -> anyhow::Result<()> {
    let gate = Arc::new(Barrier::new(2));
    let engine_gate = gate.clone();
    let engine = EngineSlot::loaded(StaticConverter::new(move |source: &str, _| {
        if source == "old" {
            engine_gate.wait();
            engine_gate.wait();
        }
        ConversionOutcome::success(format!("<p>{source}</p>"))
    }));
    let formatter = Arc::new(CountingFormatter::default());
    let pipeline = Pipeline::new(engine, formatter.clone(), PipelineConfig::default());

    let slow = {
        let pipeline = pipeline.clone();
        let ticket = pipeline.begin();
        tokio::spawn(async move { pipeline.run_ticket(ticket, "old").await })
    };
    meet(&gate).await?;
    let newer = pipeline.begin();
    meet(&gate).await?;

    assert!(matches!(slow.await?, RunOutcome::Superseded(_)));
    assert_eq!(formatter.calls.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.state(), RenderState::default());

    let applied = pipeline.run_ticket(newer, "new").await;
    assert_eq!(applied, RunOutcome::Applied(RenderState::formatted("<p>new</p>\n")));
    assert_eq!(formatter.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_diagnostics_joined_with_blank_line() -> anyhow::Result<()> {
    let engine = EngineSlot::loaded(StaticConverter::new(|_: &str, _| {
        ConversionOutcome::failure(["e1", "e2"])
    }));
    let mut session = session_with(engine, Arc::new(HtmlFormatter));

    session.edit("x").await?;

    let state = session.render_state();
    assert_eq!(state.content(), "e1\n\ne2");
    assert!(state.is_error());
    Ok(())
}

#[tokio::test]
async fn test_error_flag_tracks_outcome() -> anyhow::Result<()> {
    let mut session = session_with(asciidoc_engine(), Arc::new(HtmlFormatter));

    for (source, expect_error) in [("*ok*", false), ("*broken", true), ("", false)] {
        session.edit(source).await?;
        let state = session.render_state();
        assert_eq!(state.is_error(), expect_error, "source {source:?}");
        assert_eq!(state.is_error(), state.kind().is_error());
    }
    Ok(())
}

#[tokio::test]
async fn test_identical_input_is_deterministic() -> anyhow::Result<()> {
    let mut left = session_with(asciidoc_engine(), Arc::new(HtmlFormatter));
    let mut right = session_with(asciidoc_engine(), Arc::new(HtmlFormatter));

    left.edit("Some *strong* words").await?;
    right.edit("Some *strong* words").await?;
    assert_eq!(left.render_state(), right.render_state());

    let before = left.render_state();
    left.edit("Some *strong* words").await?;
    assert_eq!(left.render_state(), before);
    Ok(())
}

#[test]
fn test_outcome_discriminant_is_exclusive() {
    let ambiguous = r#"{"success":true,"html":"<p></p>","errors":["x"]}"#;
    assert!(ConversionOutcome::decode(ambiguous).is_err());

    let success = ConversionOutcome::decode(r#"{"success":true,"html":"<p></p>"}"#).unwrap();
    assert!(success.is_success());

    let failure = ConversionOutcome::decode(r#"{"success":false,"errors":[]}"#).unwrap();
    assert!(!failure.is_success());
}
