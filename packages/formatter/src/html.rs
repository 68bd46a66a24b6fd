//! Element categories. Names are compared case-insensitively.

pub(crate) fn is_void(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is kept byte for byte
pub(crate) fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "pre" | "textarea" | "script" | "style"
    )
}

/// Phrasing elements that flow with the surrounding text
pub(crate) fn is_inline(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "a" | "abbr"
            | "b"
            | "bdi"
            | "bdo"
            | "br"
            | "button"
            | "cite"
            | "code"
            | "data"
            | "del"
            | "dfn"
            | "em"
            | "i"
            | "img"
            | "input"
            | "ins"
            | "kbd"
            | "label"
            | "mark"
            | "q"
            | "s"
            | "samp"
            | "small"
            | "span"
            | "strong"
            | "sub"
            | "sup"
            | "time"
            | "u"
            | "var"
            | "wbr"
    )
}

/// Elements whose end tag may be left out
pub(crate) fn has_optional_end(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "p" | "li"
            | "dt"
            | "dd"
            | "tr"
            | "td"
            | "th"
            | "option"
            | "thead"
            | "tbody"
            | "tfoot"
            | "colgroup"
            | "html"
            | "head"
            | "body"
    )
}

/// Whether starting `incoming` ends the open element `open`
pub(crate) fn closes_implicitly(open: &str, incoming: &str) -> bool {
    let incoming = incoming.to_ascii_lowercase();
    match open.to_ascii_lowercase().as_str() {
        "p" => matches!(
            incoming.as_str(),
            "address"
                | "article"
                | "aside"
                | "blockquote"
                | "details"
                | "div"
                | "dl"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "header"
                | "hgroup"
                | "hr"
                | "main"
                | "menu"
                | "nav"
                | "ol"
                | "p"
                | "pre"
                | "section"
                | "table"
                | "ul"
        ),
        "li" => incoming == "li",
        "dt" | "dd" => matches!(incoming.as_str(), "dt" | "dd"),
        "tr" => matches!(incoming.as_str(), "tr" | "thead" | "tbody" | "tfoot"),
        "td" | "th" => matches!(
            incoming.as_str(),
            "td" | "th" | "tr" | "thead" | "tbody" | "tfoot"
        ),
        "thead" | "tbody" => matches!(incoming.as_str(), "tbody" | "tfoot"),
        "option" => matches!(incoming.as_str(), "option" | "optgroup"),
        _ => false,
    }
}
