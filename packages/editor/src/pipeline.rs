//! # Conversion Pipeline
//!
//! Turns one source text into one [`RenderState`]:
//!
//! 1. Guard: no engine installed → nothing happens
//! 2. Convert the source with the engine
//! 3. Decode the serialized outcome
//! 4. Failure → joined diagnostics; Success → format the HTML
//!
//! Every run holds a [`RunTicket`] taken when it was submitted. A run only
//! publishes its result while its ticket is the newest one issued, so a slow
//! run can never overwrite the result of an edit made after it started.

use adork_playground_common::{ConversionOutcome, Converter, EngineSlot, RenderState};
use adork_playground_formatter::{FormatOptions, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Timestamp handed to the engine with each conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Omit the timestamp
    None,
    /// Current time when the conversion starts
    #[default]
    Now,
    /// Fixed seconds since the Unix epoch
    Fixed(i64),
}

impl TimestampPolicy {
    pub fn resolve(self) -> Option<i64> {
        match self {
            TimestampPolicy::None => None,
            TimestampPolicy::Now => Some(chrono::Utc::now().timestamp()),
            TimestampPolicy::Fixed(seconds) => Some(seconds),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub format: FormatOptions,
    pub timestamp: TimestampPolicy,
    /// Displayed until the first run publishes
    pub initial: RenderState,
}

/// Sequence number of one submitted run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No engine installed yet; render state untouched
    EngineUnavailable,

    /// The run published this state
    Applied(RenderState),

    /// A newer run was submitted first; the result was dropped
    Superseded(RunTicket),
}

struct Shared {
    engine: EngineSlot,
    formatter: Arc<dyn Formatter>,
    config: PipelineConfig,
    latest: AtomicU64,
    state: watch::Sender<RenderState>,
}

/// Pipeline runner. Clones share tickets and render state.
#[derive(Clone)]
pub struct Pipeline {
    shared: Arc<Shared>,
}

impl Pipeline {
    pub fn new(engine: EngineSlot, formatter: Arc<dyn Formatter>, config: PipelineConfig) -> Self {
        let (state, _) = watch::channel(config.initial.clone());
        Self {
            shared: Arc::new(Shared {
                engine,
                formatter,
                config,
                latest: AtomicU64::new(0),
                state,
            }),
        }
    }

    pub fn engine(&self) -> &EngineSlot {
        &self.shared.engine
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.shared.config
    }

    /// Current render state
    pub fn state(&self) -> RenderState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified whenever a run publishes
    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.shared.state.subscribe()
    }

    /// Issue the next ticket; every run issued earlier becomes stale
    pub fn begin(&self) -> RunTicket {
        RunTicket(self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.shared.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Submit and run in one step
    pub async fn run(&self, source: &str) -> RunOutcome {
        let ticket = self.begin();
        self.run_ticket(ticket, source).await
    }

    /// Run for a ticket issued earlier by [`Pipeline::begin`]
    pub async fn run_ticket(&self, ticket: RunTicket, source: &str) -> RunOutcome {
        let Some(engine) = self.shared.engine.get() else {
            tracing::debug!(run = ticket.0, "conversion engine not loaded, skipping run");
            return RunOutcome::EngineUnavailable;
        };

        let outcome = self.convert(engine, ticket, source).await;

        let state = match outcome {
            ConversionOutcome::Failure { errors } => {
                RenderState::conversion_failed(errors.as_slice())
            }
            ConversionOutcome::Success { html } => {
                if !self.is_current(ticket) {
                    tracing::debug!(run = ticket.0, "superseded before formatting");
                    return RunOutcome::Superseded(ticket);
                }
                self.format(ticket, html).await
            }
        };

        self.publish(ticket, state)
    }

    /// Conversion runs on the blocking pool; engines may wait on a child process.
    async fn convert(
        &self,
        engine: Arc<dyn Converter>,
        ticket: RunTicket,
        source: &str,
    ) -> ConversionOutcome {
        let timestamp = self.shared.config.timestamp.resolve();
        let started = Instant::now();
        let input = source.to_string();
        let payload =
            tokio::task::spawn_blocking(move || engine.convert(&input, timestamp)).await;
        tracing::debug!(
            run = ticket.0,
            elapsed_us = started.elapsed().as_micros() as u64,
            "converted"
        );

        let payload = match payload {
            Ok(payload) => payload,
            Err(err) if err.is_panic() => {
                let message = panic_message(&*err.into_panic());
                tracing::error!(run = ticket.0, %message, "conversion engine panicked");
                return ConversionOutcome::failure([format!(
                    "conversion engine panicked: {message}"
                )]);
            }
            Err(err) => {
                tracing::warn!(run = ticket.0, error = %err, "conversion task cancelled");
                return ConversionOutcome::failure([format!("conversion was cancelled: {err}")]);
            }
        };

        match ConversionOutcome::decode(&payload) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(run = ticket.0, error = %err, %payload, "malformed conversion outcome");
                ConversionOutcome::malformed(&err)
            }
        }
    }

    async fn format(&self, ticket: RunTicket, html: String) -> RenderState {
        match self
            .shared
            .formatter
            .format(&html, &self.shared.config.format)
            .await
        {
            Ok(pretty) => RenderState::formatted(pretty),
            Err(err) => {
                tracing::warn!(run = ticket.0, error = %err, "failed to format HTML");
                // The raw markup is the only record of what the formatter rejected
                tracing::debug!(run = ticket.0, %html, "unformatted conversion output");
                RenderState::format_failed(err.to_string())
            }
        }
    }

    /// Store `state` unless a newer ticket was issued. The check and the
    /// store happen under the channel's lock.
    fn publish(&self, ticket: RunTicket, state: RenderState) -> RunOutcome {
        let latest = &self.shared.latest;
        let mut published = false;

        self.shared.state.send_if_modified(|current| {
            if latest.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            *current = state.clone();
            published = true;
            true
        });

        if published {
            tracing::debug!(run = ticket.0, is_error = state.is_error(), "render state published");
            RunOutcome::Applied(state)
        } else {
            tracing::debug!(run = ticket.0, "superseded, result discarded");
            RunOutcome::Superseded(ticket)
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
