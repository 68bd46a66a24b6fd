use crate::error::{FormatError, FormatResult};
use crate::html;
use crate::lexer::{Attribute, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
    Raw(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

struct Open {
    element: Element,
    offset: usize,
}

/// Resolve the token stream into a tree, applying HTML's implicit end tags
pub(crate) fn build(source: &str, tokens: Vec<Token>) -> FormatResult<Vec<Node>> {
    let mut builder = TreeBuilder {
        source,
        stack: Vec::new(),
        root: Vec::new(),
    };

    for token in tokens {
        builder.push(token)?;
    }
    builder.finish()
}

struct TreeBuilder<'src> {
    source: &'src str,
    stack: Vec<Open>,
    root: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn push(&mut self, token: Token) -> FormatResult<()> {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
                offset,
            } => {
                while self
                    .stack
                    .last()
                    .is_some_and(|open| html::closes_implicitly(&open.element.name, &name))
                {
                    self.close_top();
                }

                let element = Element {
                    name,
                    attrs,
                    children: Vec::new(),
                };
                if self_closing || html::is_void(&element.name) {
                    self.attach(Node::Element(element));
                } else {
                    self.stack.push(Open { element, offset });
                }
            }
            Token::EndTag { name, offset } => self.end_tag(&name, offset)?,
            Token::Text(text) => self.attach(Node::Text(text)),
            Token::RawText(text) => self.attach(Node::Raw(text)),
            Token::Comment(text) => self.attach(Node::Comment(text)),
            Token::Doctype(text) => self.attach(Node::Doctype(text)),
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str, offset: usize) -> FormatResult<()> {
        // `</br>` and friends carry no structure
        if html::is_void(name) {
            return Ok(());
        }

        let Some(index) = self
            .stack
            .iter()
            .rposition(|open| open.element.name.eq_ignore_ascii_case(name))
        else {
            return Err(self.error(offset, format!("unexpected closing tag `</{name}>`")));
        };

        if let Some(blocking) = self.stack[index + 1..]
            .iter()
            .rev()
            .find(|open| !html::has_optional_end(&open.element.name))
        {
            return Err(self.error(
                offset,
                format!(
                    "unexpected closing tag `</{name}>`, expected `</{}>`",
                    blocking.element.name
                ),
            ));
        }

        while self.stack.len() > index {
            self.close_top();
        }
        Ok(())
    }

    fn finish(mut self) -> FormatResult<Vec<Node>> {
        if let Some(open) = self
            .stack
            .iter()
            .find(|open| !html::has_optional_end(&open.element.name))
        {
            return Err(self.error(
                open.offset,
                format!("unclosed element `<{}>`", open.element.name),
            ));
        }

        while !self.stack.is_empty() {
            self.close_top();
        }
        Ok(self.root)
    }

    fn close_top(&mut self) {
        if let Some(open) = self.stack.pop() {
            self.attach(Node::Element(open.element));
        }
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(open) => open.element.children.push(node),
            None => self.root.push(node),
        }
    }

    fn error(&self, offset: usize, message: String) -> FormatError {
        FormatError::syntax(self.source, offset, message)
    }
}
