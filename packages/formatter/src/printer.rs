use crate::html;
use crate::lexer::Attribute;
use crate::options::FormatOptions;
use crate::tree::{Element, Node};

struct Context<'a> {
    options: &'a FormatOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        self.add_indent();
        self.add(text);
        self.add("\n");
    }

    fn add_indent(&mut self) {
        let width = self.indent_width();
        self.buffer.extend(std::iter::repeat(' ').take(width));
    }

    fn indent_width(&self) -> usize {
        self.depth * self.options.tab_width
    }

    /// Columns left on the current line after indentation
    fn remaining(&self) -> usize {
        self.options.print_width.saturating_sub(self.indent_width())
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

pub(crate) fn print(nodes: &[Node], options: &FormatOptions) -> String {
    let mut ctx = Context::new(options);
    print_children(nodes, &mut ctx);
    ctx.get_output()
}

/// Block context: block nodes get their own lines, runs of inline nodes
/// between them are filled to the print width.
fn print_children(nodes: &[Node], ctx: &mut Context) {
    let mut run: Vec<&Node> = Vec::new();

    for node in nodes {
        if is_inline_node(node) {
            run.push(node);
            continue;
        }

        fill(&run, ctx);
        run.clear();

        match node {
            Node::Element(element) => print_element(element, ctx),
            Node::Comment(text) => ctx.add_line(&format!("<!--{}-->", text)),
            Node::Doctype(text) => ctx.add_line(&format!("<!{}>", text)),
            Node::Raw(text) => ctx.add_line(text.trim()),
            Node::Text(_) => {}
        }
    }

    fill(&run, ctx);
}

fn print_element(element: &Element, ctx: &mut Context) {
    let open = open_tag(element);

    if html::is_void(&element.name) {
        ctx.add_line(&open);
        return;
    }

    let close = format!("</{}>", element.name);

    if html::is_raw_text(&element.name) {
        ctx.add_indent();
        ctx.add(&open);
        for child in &element.children {
            if let Node::Raw(text) | Node::Text(text) = child {
                ctx.add(text);
            }
        }
        ctx.add(&close);
        ctx.add("\n");
        return;
    }

    if element.children.iter().all(is_inline_node) {
        let inner = collapse_whitespace(&flat_children(&element.children));
        let flat = format!("{}{}{}", open, inner.trim(), close);

        if flat.chars().count() <= ctx.remaining() {
            ctx.add_line(&flat);
            return;
        }

        ctx.add_line(&open);
        ctx.indent();
        let run: Vec<&Node> = element.children.iter().collect();
        fill(&run, ctx);
        ctx.dedent();
        ctx.add_line(&close);
        return;
    }

    ctx.add_line(&open);
    ctx.indent();
    print_children(&element.children, ctx);
    ctx.dedent();
    ctx.add_line(&close);
}

/// Lay out inline content as words, breaking lines at the print width.
/// Inline elements are never split.
fn fill(run: &[&Node], ctx: &mut Context) {
    let width = ctx.remaining();
    let mut line = String::new();

    for word in words(run) {
        if line.is_empty() {
            line = word;
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(&word);
        } else {
            ctx.add_line(&line);
            line = word;
        }
    }

    if !line.is_empty() {
        ctx.add_line(&line);
    }
}

/// Split inline content on whitespace; markup glued to text stays one word
fn words(run: &[&Node]) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for node in run {
        match node {
            Node::Text(text) => {
                for ch in text.chars() {
                    if ch.is_whitespace() {
                        if !current.is_empty() {
                            words.push(std::mem::take(&mut current));
                        }
                    } else {
                        current.push(ch);
                    }
                }
            }
            other => current.push_str(&flat_node(other)),
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn flat_children(nodes: &[Node]) -> String {
    nodes.iter().map(flat_node).collect()
}

fn flat_node(node: &Node) -> String {
    match node {
        Node::Element(element) if html::is_void(&element.name) => open_tag(element),
        Node::Element(element) if html::is_raw_text(&element.name) => format!(
            "{}{}</{}>",
            open_tag(element),
            flat_children(&element.children),
            element.name
        ),
        Node::Element(element) => format!(
            "{}{}</{}>",
            open_tag(element),
            collapse_whitespace(&flat_children(&element.children)),
            element.name
        ),
        Node::Text(text) | Node::Raw(text) => text.clone(),
        Node::Comment(text) => format!("<!--{}-->", text),
        Node::Doctype(text) => format!("<!{}>", text),
    }
}

fn open_tag(element: &Element) -> String {
    let mut tag = format!("<{}", element.name);
    for attr in &element.attrs {
        tag.push(' ');
        tag.push_str(&attribute(attr));
    }
    if html::is_void(&element.name) {
        tag.push_str(" />");
    } else {
        tag.push('>');
    }
    tag
}

fn attribute(attr: &Attribute) -> String {
    match &attr.value {
        None => attr.name.clone(),
        Some(value) if value.contains('"') && !value.contains('\'') => {
            format!("{}='{}'", attr.name, value)
        }
        Some(value) => format!("{}=\"{}\"", attr.name, value.replace('"', "&quot;")),
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn is_inline_node(node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(element) => {
            html::is_inline(&element.name) && !html::is_raw_text(&element.name)
        }
        _ => false,
    }
}
