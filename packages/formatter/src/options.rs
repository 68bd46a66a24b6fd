use serde::{Deserialize, Serialize};
use std::fmt;

/// Markup language the conversion engine emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupSyntax {
    #[default]
    Html,
    Xml,
}

impl fmt::Display for MarkupSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupSyntax::Html => f.write_str("html"),
            MarkupSyntax::Xml => f.write_str("xml"),
        }
    }
}

/// Options for pretty-printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Syntax of the markup being formatted
    pub syntax: MarkupSyntax,
    /// Preferred maximum line width
    pub print_width: usize,
    /// Spaces per indentation level
    pub tab_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            syntax: MarkupSyntax::Html,
            print_width: 60,
            tab_width: 2,
        }
    }
}
