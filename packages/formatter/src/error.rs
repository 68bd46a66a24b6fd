use crate::options::MarkupSyntax;
use thiserror::Error;

pub type FormatResult<T> = Result<T, FormatError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{message} ({line}:{column})")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("No formatter available for {0} output")]
    UnsupportedSyntax(MarkupSyntax),
}

impl FormatError {
    /// Syntax error at a byte offset into `source`
    pub fn syntax(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };

        Self::Syntax {
            message: message.into(),
            line,
            column,
        }
    }
}
