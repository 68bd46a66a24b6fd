//! # Edit Session
//!
//! Owns the editable source and feeds every change into the pipeline.
//!
//! Each change is submitted as its own task with a ticket taken at
//! submission time. With a non-zero debounce the task first waits; if
//! another edit arrived in the meantime it gives up without converting.

use crate::pipeline::{Pipeline, RunOutcome};
use crate::EditorError;
use adork_playground_common::{Converter, RenderState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Single-user editing session
pub struct EditSession {
    source: String,
    pipeline: Pipeline,
    debounce: Duration,
}

impl EditSession {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            source: String::new(),
            pipeline,
            debounce: Duration::ZERO,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn render_state(&self) -> RenderState {
        self.pipeline.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.pipeline.subscribe()
    }

    /// Replace the source and submit a pipeline run for it.
    ///
    /// Must be called from within a tokio runtime. The returned handle can
    /// be dropped; results also reach subscribers.
    pub fn set_source(&mut self, source: impl Into<String>) -> JoinHandle<RunOutcome> {
        self.source = source.into();
        self.submit()
    }

    /// Submit the current source again, e.g. after the engine loads
    pub fn refresh(&self) -> JoinHandle<RunOutcome> {
        self.submit()
    }

    /// Replace the source and wait for its run to finish
    pub async fn edit(&mut self, source: impl Into<String>) -> Result<RunOutcome, EditorError> {
        Ok(self.set_source(source).await?)
    }

    /// Install the conversion engine. Does not re-run; see [`EditSession::refresh`].
    pub fn install_engine(&self, converter: Arc<dyn Converter>) -> Result<(), EditorError> {
        self.pipeline.engine().install(converter)?;
        tracing::info!("conversion engine installed");
        Ok(())
    }

    fn submit(&self) -> JoinHandle<RunOutcome> {
        let ticket = self.pipeline.begin();
        let pipeline = self.pipeline.clone();
        let source = self.source.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
                if !pipeline.is_current(ticket) {
                    tracing::debug!(run = ticket.sequence(), "edit superseded while debouncing");
                    return RunOutcome::Superseded(ticket);
                }
            }
            pipeline.run_ticket(ticket, &source).await
        })
    }
}
