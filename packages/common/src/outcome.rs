//! # Conversion outcomes
//!
//! The conversion engine answers every call with a JSON payload:
//!
//! ```text
//! { "success": true,  "html": "<div>...</div>" }
//! { "success": false, "errors": ["first diagnostic", "second diagnostic"] }
//! ```
//!
//! `success` is the discriminant. Any other shape is a contract violation
//! reported as a [`DecodeError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of one conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireOutcome", into = "WireOutcome")]
pub enum ConversionOutcome {
    /// The engine produced renderable markup
    Success { html: String },

    /// The engine rejected the input; diagnostics in production order
    Failure { errors: Vec<String> },
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid outcome JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("successful outcome is missing `html`")]
    MissingHtml,

    #[error("failed outcome is missing `errors`")]
    MissingErrors,

    #[error("{0} outcome carries both `html` and `errors`")]
    Ambiguous(&'static str),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireOutcome {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl TryFrom<WireOutcome> for ConversionOutcome {
    type Error = DecodeError;

    fn try_from(wire: WireOutcome) -> Result<Self, Self::Error> {
        match (wire.success, wire.html, wire.errors) {
            (true, Some(html), None) => Ok(Self::Success { html }),
            (false, None, Some(errors)) => Ok(Self::Failure { errors }),
            (true, None, _) => Err(DecodeError::MissingHtml),
            (false, _, None) => Err(DecodeError::MissingErrors),
            (true, Some(_), Some(_)) => Err(DecodeError::Ambiguous("successful")),
            (false, Some(_), Some(_)) => Err(DecodeError::Ambiguous("failed")),
        }
    }
}

impl From<ConversionOutcome> for WireOutcome {
    fn from(outcome: ConversionOutcome) -> Self {
        match outcome {
            ConversionOutcome::Success { html } => Self {
                success: true,
                html: Some(html),
                errors: None,
            },
            ConversionOutcome::Failure { errors } => Self {
                success: false,
                html: None,
                errors: Some(errors),
            },
        }
    }
}

impl ConversionOutcome {
    pub fn success(html: impl Into<String>) -> Self {
        Self::Success { html: html.into() }
    }

    pub fn failure<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Failure {
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    /// Synthetic failure standing in for a payload that could not be decoded
    pub fn malformed(error: &DecodeError) -> Self {
        Self::failure([format!(
            "conversion engine returned a malformed outcome: {error}"
        )])
    }

    /// Decode a serialized outcome, validating its shape
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        let wire: WireOutcome = serde_json::from_str(payload)?;
        Self::try_from(wire)
    }

    /// Serialize to the wire format
    pub fn encode(&self) -> String {
        match self {
            Self::Success { html } => serde_json::json!({ "success": true, "html": html }),
            Self::Failure { errors } => {
                serde_json::json!({ "success": false, "errors": errors })
            }
        }
        .to_string()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
