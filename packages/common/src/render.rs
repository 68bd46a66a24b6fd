use serde::{Deserialize, Serialize};

/// Shown before the first pipeline run completes
pub const DEFAULT_HTML: &str = "<div class=\"paragraph\">
  <p>Hello, <strong>Asciidork!</strong></p>
</div>";

/// Source text the playground opens with
pub const DEFAULT_SOURCE: &str = "Hello, *AsciiDork!*";

/// Placed between conversion diagnostics
pub const DIAGNOSTIC_SEPARATOR: &str = "\n\n";

/// Which terminal outcome produced the displayed content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderKind {
    /// Converted and pretty-printed markup
    Formatted,
    /// Diagnostics reported by the conversion engine
    ConversionFailed,
    /// The formatter rejected markup the engine produced
    FormatFailed,
}

impl RenderKind {
    pub fn is_error(self) -> bool {
        !matches!(self, RenderKind::Formatted)
    }
}

/// Snapshot handed to the presentation layer.
///
/// Fields are private so `is_error` always agrees with `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    content: String,
    is_error: bool,
    kind: RenderKind,
}

impl RenderState {
    fn new(content: String, kind: RenderKind) -> Self {
        Self {
            content,
            is_error: kind.is_error(),
            kind,
        }
    }

    pub fn formatted(content: impl Into<String>) -> Self {
        Self::new(content.into(), RenderKind::Formatted)
    }

    /// Diagnostics joined with a blank line, in the order given
    pub fn conversion_failed<S: AsRef<str>>(errors: &[S]) -> Self {
        let joined = errors
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(DIAGNOSTIC_SEPARATOR);
        Self::new(joined, RenderKind::ConversionFailed)
    }

    pub fn format_failed(message: impl Into<String>) -> Self {
        Self::new(message.into(), RenderKind::FormatFailed)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn kind(&self) -> RenderKind {
        self.kind
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::formatted(DEFAULT_HTML)
    }
}
