pub mod render;
pub mod watch;

pub use render::{render, RenderArgs};
pub use watch::{watch, WatchArgs};

use crate::config::{Config, EngineConfig, TimestampSetting};
use adork_playground_common::{CommandConverter, EngineSlot, OutputMode, RenderState};
use adork_playground_editor::{EditSession, Pipeline, PipelineConfig};
use adork_playground_formatter::{FormatOptions, HtmlFormatter};
use clap::Args;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

/// Flags shared by every command that runs the pipeline; each overrides the config file
#[derive(Debug, Args, Default)]
pub struct EngineArgs {
    /// Conversion engine program
    #[arg(long)]
    pub engine: Option<String>,

    /// Argument passed to the engine (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// The engine prints HTML instead of a JSON outcome
    #[arg(long)]
    pub raw_output: bool,

    /// Maximum line width of the formatted HTML
    #[arg(long)]
    pub print_width: Option<usize>,

    /// Timestamp for the engine (now, none, or seconds since the epoch)
    #[arg(long)]
    pub timestamp: Option<TimestampSetting>,

    /// Quiet period before an edit is converted, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

impl EngineArgs {
    /// Config with command-line overrides applied
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();

        if let Some(command) = &self.engine {
            config.engine = Some(EngineConfig {
                command: command.clone(),
                args: self.engine_args.clone(),
                output: OutputMode::default(),
            });
        } else if let Some(engine) = config.engine.as_mut() {
            if !self.engine_args.is_empty() {
                engine.args = self.engine_args.clone();
            }
        }
        if self.raw_output {
            if let Some(engine) = config.engine.as_mut() {
                engine.output = OutputMode::Raw;
            }
        }
        if let Some(width) = self.print_width {
            config.print_width = width;
        }
        if let Some(timestamp) = self.timestamp {
            config.timestamp = timestamp;
        }
        if let Some(debounce) = self.debounce_ms {
            config.debounce_ms = debounce;
        }

        config
    }

    /// Engine flags that had no engine to apply to
    pub fn ignored_flags(&self, merged: &Config) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if merged.engine.is_none() {
            if self.raw_output {
                ignored.push("--raw-output");
            }
            if !self.engine_args.is_empty() {
                ignored.push("--engine-arg");
            }
        }
        ignored
    }
}

/// Tell the user when there is no engine and engine flags went unused
pub fn warn_without_engine(args: &EngineArgs, config: &Config) {
    if config.engine.is_some() {
        return;
    }
    eprintln!(
        "{}",
        "⚠️  No conversion engine configured, showing initial content".yellow()
    );
    for flag in args.ignored_flags(config) {
        eprintln!(
            "{}",
            format!("⚠️  {flag} is ignored without --engine or a configured engine").yellow()
        );
    }
}

/// Wire the engine, formatter and pipeline described by `config`
pub fn build_session(config: &Config) -> EditSession {
    let engine = match &config.engine {
        Some(engine) => {
            tracing::debug!(command = %engine.command, output = ?engine.output, "using command engine");
            EngineSlot::loaded(
                CommandConverter::new(&engine.command)
                    .args(engine.args.iter().cloned())
                    .output_mode(engine.output),
            )
        }
        None => EngineSlot::empty(),
    };

    let initial = config
        .initial_content
        .as_ref()
        .map(|content| RenderState::formatted(content.clone()))
        .unwrap_or_default();

    let pipeline = Pipeline::new(
        engine,
        Arc::new(HtmlFormatter),
        PipelineConfig {
            format: FormatOptions {
                print_width: config.print_width,
                ..FormatOptions::default()
            },
            timestamp: config.timestamp.into(),
            initial,
        },
    );

    EditSession::new(pipeline).with_debounce(Duration::from_millis(config.debounce_ms))
}
