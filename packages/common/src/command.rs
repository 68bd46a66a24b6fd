//! Out-of-process conversion engine.
//!
//! Runs an external program with the AsciiDoc source on stdin. The
//! timestamp travels in `SOURCE_DATE_EPOCH`.

use crate::engine::Converter;
use crate::error::EngineError;
use crate::outcome::ConversionOutcome;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Output, Stdio};

pub const TIMESTAMP_ENV: &str = "SOURCE_DATE_EPOCH";

/// How to read the engine's stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// stdout carries the serialized outcome
    #[default]
    Json,
    /// stdout is the HTML; a non-zero exit means failure and stderr holds
    /// diagnostics separated by blank lines
    Raw,
}

#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
    mode: OutputMode,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            mode: OutputMode::default(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    fn run(&self, source: &str, timestamp: Option<i64>) -> Result<Output, EngineError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(timestamp) = timestamp {
            command.env(TIMESTAMP_ENV, timestamp.to_string());
        }

        let mut child = command
            .spawn()
            .map_err(|e| EngineError::spawn(&self.program, e))?;
        let stdin = child.stdin.take();

        let output = std::thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    // The engine may exit without draining its input
                    let _ = stdin.write_all(source.as_bytes());
                });
            }
            child.wait_with_output()
        })?;

        Ok(output)
    }

    fn interpret(&self, output: Output) -> String {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        match self.mode {
            OutputMode::Json if output.status.success() || !stdout.trim().is_empty() => stdout,
            _ if output.status.success() => ConversionOutcome::success(stdout).encode(),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let mut errors = split_diagnostics(&stderr);
                if errors.is_empty() {
                    errors.push(format!(
                        "conversion engine `{}` exited with {}",
                        self.program, output.status
                    ));
                }
                ConversionOutcome::Failure { errors }.encode()
            }
        }
    }
}

impl Converter for CommandConverter {
    fn convert(&self, source: &str, timestamp: Option<i64>) -> String {
        match self.run(source, timestamp) {
            Ok(output) => self.interpret(output),
            Err(err) => {
                tracing::warn!(program = %self.program, error = %err, "conversion engine unavailable");
                ConversionOutcome::failure([err.to_string()]).encode()
            }
        }
    }
}

/// Split engine stderr into diagnostics separated by blank lines
pub fn split_diagnostics(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let mut diagnostics = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                diagnostics.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        diagnostics.push(current.join("\n"));
    }

    diagnostics
}
