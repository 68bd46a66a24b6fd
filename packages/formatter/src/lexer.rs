//! HTML tokenizer using logos
//!
//! Produces a flat token stream; nesting is resolved in `tree`. Offsets are
//! byte positions of the token's opening `<`, used for error locations.
//!
//! Three logos token sets share one cursor: [`Markup`] between tags,
//! [`TagToken`] inside a tag and [`ValueToken`] after an attribute's `=`.
//! Comments, declarations and raw-text bodies are cut from the remainder
//! and skipped with `bump`.

use crate::error::{FormatError, FormatResult};
use crate::html;
use logos::{Lexer, Logos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
        offset: usize,
    },
    EndTag {
        name: String,
        offset: usize,
    },
    Text(String),
    /// Verbatim content of `pre`, `textarea`, `script` and `style`
    RawText(String),
    Comment(String),
    Doctype(String),
}

/// Tokens between tags
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Markup<'src> {
    #[regex(r"[^<]+")]
    Text,

    // A `<` that opens no markup is plain text
    #[token("<")]
    #[token("</")]
    LoneAngle,

    #[token("<!")]
    Declaration,

    #[regex(r"<[a-zA-Z][a-zA-Z0-9_:.\-]*", |lex| &lex.slice()[1..])]
    StartTag(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9_:.\-]*", |lex| &lex.slice()[2..])]
    EndTag(&'src str),
}

/// Tokens inside `<name ...>` and `</name ...>`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\x0C\r]+")]
enum TagToken<'src> {
    #[token(">")]
    Close,

    #[token("/>")]
    SelfClose,

    #[token("/")]
    Slash,

    #[token("=")]
    Equals,

    #[regex(r"[^ \t\n\x0C\r=>/]+", |lex| lex.slice())]
    Name(&'src str),
}

/// Attribute value following `=`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\x0C\r]+")]
enum ValueToken<'src> {
    /// `name=>`: empty value, tag ends
    #[token(">")]
    Close,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1] // Strip quotes
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1] // Strip quotes
    })]
    Quoted(&'src str),

    #[regex(r#"[^ \t\n\x0C\r>"'][^ \t\n\x0C\r>]*"#, |lex| lex.slice())]
    Unquoted(&'src str),
}

type MarkupLexer<'src> = Lexer<'src, Markup<'src>>;

pub(crate) fn tokenize(source: &str) -> FormatResult<Vec<Token>> {
    Tokenizer {
        source,
        tokens: Vec::new(),
        text: String::new(),
    }
    .run()
}

struct Tokenizer<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// Pending text, flushed when markup starts
    text: String,
}

impl<'src> Tokenizer<'src> {
    fn run(mut self) -> FormatResult<Vec<Token>> {
        let mut lex = Markup::lexer(self.source);

        while let Some(token) = lex.next() {
            let start = lex.span().start;
            match token {
                Ok(Markup::Text | Markup::LoneAngle) => self.text.push_str(lex.slice()),
                Ok(Markup::Declaration) => {
                    self.flush_text();
                    self.declaration(&mut lex, start)?;
                }
                Ok(Markup::StartTag(name)) => {
                    self.flush_text();
                    lex = self.start_tag(lex, name, start)?;
                }
                Ok(Markup::EndTag(name)) => {
                    self.flush_text();
                    lex = self.end_tag(lex, name, start)?;
                }
                Err(()) => return Err(self.error(start, "unexpected character")),
            }
        }

        self.flush_text();
        Ok(self.tokens)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> FormatError {
        FormatError::syntax(self.source, offset, message)
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    /// `<!-- ... -->` or `<!DOCTYPE ...>`
    fn declaration(&mut self, lex: &mut MarkupLexer<'src>, start: usize) -> FormatResult<()> {
        let rest = lex.remainder();

        if let Some(comment) = rest.strip_prefix("--") {
            let Some(len) = comment.find("-->") else {
                return Err(self.error(start, "unterminated comment"));
            };
            self.tokens.push(Token::Comment(comment[..len].to_string()));
            lex.bump("--".len() + len + "-->".len());
        } else {
            let Some(len) = rest.find('>') else {
                return Err(self.error(start, "unexpected end of input in declaration"));
            };
            self.tokens.push(Token::Doctype(rest[..len].to_string()));
            lex.bump(len + 1);
        }

        Ok(())
    }

    fn start_tag(
        &mut self,
        lex: MarkupLexer<'src>,
        name: &'src str,
        start: usize,
    ) -> FormatResult<MarkupLexer<'src>> {
        let unterminated = || format!("unexpected end of input in tag `<{name}`");
        let mut tag = lex.morph::<TagToken>();
        let mut attrs = Vec::new();
        let mut pending: Option<&str> = None;

        let self_closing = loop {
            let Some(token) = tag.next() else {
                return Err(self.error(start, unterminated()));
            };
            match token {
                Ok(TagToken::Name(attr)) => attrs.extend(pending.replace(attr).map(Attribute::bare)),
                Ok(TagToken::Slash) => attrs.extend(pending.take().map(Attribute::bare)),
                Ok(TagToken::Close) => {
                    attrs.extend(pending.take().map(Attribute::bare));
                    break false;
                }
                Ok(TagToken::SelfClose) => {
                    attrs.extend(pending.take().map(Attribute::bare));
                    break true;
                }
                Ok(TagToken::Equals) => {
                    let Some(attr) = pending.take() else {
                        return Err(self.error(
                            tag.span().start,
                            format!("unexpected character in tag `<{name}`"),
                        ));
                    };

                    let mut value = tag.morph::<ValueToken>();
                    let (text, closed) = match value.next() {
                        Some(Ok(ValueToken::Quoted(text) | ValueToken::Unquoted(text))) => (text, false),
                        Some(Ok(ValueToken::Close)) => ("", true),
                        // Only an unmatched quote fails to lex
                        Some(Err(())) | None => return Err(self.error(start, unterminated())),
                    };
                    attrs.push(Attribute {
                        name: attr.to_string(),
                        value: Some(text.to_string()),
                    });
                    tag = value.morph();

                    if closed {
                        break false;
                    }
                }
                Err(()) => {
                    return Err(self.error(
                        tag.span().start,
                        format!("unexpected character in tag `<{name}`"),
                    ));
                }
            }
        };

        self.tokens.push(Token::StartTag {
            name: name.to_string(),
            attrs,
            self_closing,
            offset: start,
        });

        let mut lex = tag.morph::<Markup>();
        if !self_closing && html::is_raw_text(name) {
            self.raw_text(&mut lex, name, start)?;
        }
        Ok(lex)
    }

    fn end_tag(
        &mut self,
        lex: MarkupLexer<'src>,
        name: &'src str,
        start: usize,
    ) -> FormatResult<MarkupLexer<'src>> {
        let mut tag = lex.morph::<TagToken>();

        match tag.next() {
            Some(Ok(TagToken::Close)) => {}
            Some(_) => {
                return Err(self.error(
                    tag.span().start,
                    format!("unexpected character in closing tag `</{name}>`"),
                ));
            }
            None => {
                return Err(self.error(
                    start,
                    format!("unexpected end of input in closing tag `</{name}`"),
                ));
            }
        }

        self.tokens.push(Token::EndTag {
            name: name.to_string(),
            offset: start,
        });
        Ok(tag.morph())
    }

    /// Everything up to the matching close tag, left for the markup lexer
    fn raw_text(&mut self, lex: &mut MarkupLexer<'src>, name: &str, start: usize) -> FormatResult<()> {
        let closing = format!("</{}", name.to_ascii_lowercase());
        let rest = lex.remainder();
        let Some(len) = rest.to_ascii_lowercase().find(&closing) else {
            return Err(self.error(start, format!("unclosed element `<{name}>`")));
        };

        self.tokens.push(Token::RawText(rest[..len].to_string()));
        lex.bump(len);
        Ok(())
    }
}
