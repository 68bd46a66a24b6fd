//! # AsciiDork Playground Editor
//!
//! Live-preview core: source edits in, formatted HTML out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: source text + debounced submits    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ pipeline: convert → decode → format         │
//! │  - No engine installed → no-op              │
//! │  - Failure → joined diagnostics             │
//! │  - Stale runs never publish                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ RenderState: watch channel for displays     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adork_playground_common::EngineSlot;
//! use adork_playground_editor::{EditSession, Pipeline, PipelineConfig};
//! use adork_playground_formatter::HtmlFormatter;
//! use std::sync::Arc;
//!
//! let pipeline = Pipeline::new(engine, Arc::new(HtmlFormatter), PipelineConfig::default());
//! let mut session = EditSession::new(pipeline);
//!
//! session.edit("Hello, *AsciiDork!*").await?;
//! println!("{}", session.render_state().content());
//! ```

mod errors;
mod pipeline;
mod session;

pub use errors::EditorError;
pub use pipeline::{Pipeline, PipelineConfig, RunOutcome, RunTicket, TimestampPolicy};
pub use session::EditSession;
