//! # Markup formatter
//!
//! Pretty-prints the HTML produced by the conversion engine before it is
//! displayed.
//!
//! ```text
//! markup → lexer (tokens) → tree (nesting, implicit end tags) → printer
//! ```
//!
//! Block elements go on their own lines. Elements holding only inline
//! content stay on one line when they fit in `print_width`; otherwise their
//! content is filled word by word. `pre`, `textarea`, `script` and `style`
//! keep their content verbatim.
//!
//! ## Usage
//!
//! ```rust
//! use adork_playground_formatter::{format_html, FormatOptions};
//!
//! let pretty = format_html(
//!     "<div class=\"paragraph\"><p>Hello, <strong>AsciiDork!</strong></p></div>",
//!     &FormatOptions::default(),
//! )?;
//! assert_eq!(
//!     pretty,
//!     "<div class=\"paragraph\">\n  <p>Hello, <strong>AsciiDork!</strong></p>\n</div>\n"
//! );
//! # Ok::<(), adork_playground_formatter::FormatError>(())
//! ```

mod error;
mod html;
mod lexer;
mod options;
mod printer;
mod tree;


use async_trait::async_trait;

pub use error::{FormatError, FormatResult};
pub use options::{FormatOptions, MarkupSyntax};

/// Formatter abstraction.
///
/// Implementations report malformed input as an error value rather than
/// panicking, so callers can show the message.
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn format(&self, markup: &str, options: &FormatOptions) -> FormatResult<String>;
}

/// HTML pretty-printer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

#[async_trait]
impl Formatter for HtmlFormatter {
    async fn format(&self, markup: &str, options: &FormatOptions) -> FormatResult<String> {
        if options.syntax != MarkupSyntax::Html {
            return Err(FormatError::UnsupportedSyntax(options.syntax));
        }
        format_html(markup, options)
    }
}

/// Format an HTML fragment or document
pub fn format_html(markup: &str, options: &FormatOptions) -> FormatResult<String> {
    let tokens = lexer::tokenize(markup)?;
    let nodes = tree::build(markup, tokens)?;
    Ok(printer::print(&nodes, options))
}
