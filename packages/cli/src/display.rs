//! Terminal presentation of render states

use adork_playground_common::{RenderKind, RenderState};
use colored::Colorize;

/// Text printed for `state`
pub fn present(state: &RenderState) -> String {
    match state.kind() {
        RenderKind::Formatted => highlight(state.content()),
        RenderKind::ConversionFailed => {
            format!("{}\n{}", "✗ Conversion failed".red().bold(), state.content().red())
        }
        RenderKind::FormatFailed => format!(
            "{}\n{}",
            "✗ Formatter crashed (please report this)".red().bold(),
            state.content().red()
        ),
    }
}

/// Colour tag markup cyan; text content stays plain
fn highlight(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];
        let end = tag.find('>').map_or(tag.len(), |i| i + 1);
        out.push_str(&tag[..end].cyan().to_string());
        rest = &tag[end..];
    }
    out.push_str(rest);

    out
}
