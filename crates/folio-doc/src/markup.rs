#![forbid(unsafe_code)]

//! Markup codec for the document tree.
//!
//! Serialization is canonical: lowercase tags, attributes in source order
//! with double quotes, void elements written as `<tag />`. Two documents
//! with the same tree always serialize to the same bytes, which is what the
//! history engine relies on for change detection.
//!
//! Parsing accepts the XHTML-like subset the serializer produces plus a few
//! leniencies (single-quoted or unquoted attribute values, `<br>` without
//! the slash, comments). Anything structurally broken is a [`MarkupError`].
//! Elements may nest at most [`MAX_DEPTH`] levels deep.

use thiserror::Error;

use crate::node::{Element, Node};

/// Deepest element nesting the parser accepts.
///
/// Edits refuse to build trees deeper than this, so every serialized
/// document parses back.
pub const MAX_DEPTH: usize = 256;

/// Errors produced while parsing markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A tag or attribute name was expected but not found.
    #[error("expected a name at byte {offset}")]
    ExpectedName { offset: usize },

    /// A specific character was expected.
    #[error("expected '{expected}' at byte {offset}")]
    Expected { expected: char, offset: usize },

    /// Input ended inside a tag.
    #[error("unexpected end of input inside a tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },

    /// Input ended inside a quoted attribute value.
    #[error("unterminated attribute value starting at byte {offset}")]
    UnterminatedAttribute { offset: usize },

    /// Input ended inside a comment.
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    /// An element was never closed.
    #[error("element <{tag}> opened at byte {offset} is never closed")]
    UnclosedElement { tag: String, offset: usize },

    /// A closing tag did not match the open element.
    #[error("closing tag </{found}> at byte {offset} does not match open <{expected}>")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },

    /// A closing tag appeared with no open element.
    #[error("closing tag </{tag}> at byte {offset} has no matching open element")]
    UnexpectedClose { tag: String, offset: usize },

    /// Elements nest deeper than [`MAX_DEPTH`].
    #[error("element at byte {offset} nests deeper than {MAX_DEPTH} levels")]
    TooDeep { offset: usize },
}

/// Parse a markup fragment into a list of nodes.
pub fn parse_fragment(input: &str) -> Result<Vec<Node>, MarkupError> {
    let mut parser = Parser { src: input, pos: 0 };
    parser.parse_nodes(None, 0)
}

/// Serialize a list of nodes.
#[must_use]
pub fn serialize_fragment(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

/// Serialize a single node.
#[must_use]
pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

enum Step<'a> {
    Node(&'a Node),
    Close(&'a str),
}

// Explicit stack: hand-built trees may nest past MAX_DEPTH.
fn write_node(node: &Node, out: &mut String) {
    let mut stack = vec![Step::Node(node)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Step::Node(Node::Text(text)) => escape_text(text, out),
            Step::Node(Node::Element(element)) => {
                write_open_tag(element, out);
                if !element.is_void() {
                    stack.push(Step::Close(&element.tag));
                    stack.extend(element.children.iter().rev().map(Step::Node));
                }
            }
        }
    }
}

fn write_open_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    if element.is_void() {
        out.push_str(" />");
    } else {
        out.push('>');
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Decode character references. Unknown references are kept verbatim.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), MarkupError> {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(MarkupError::Expected {
                expected,
                offset: self.pos,
            })
        }
    }

    fn read_name(&mut self) -> Result<String, MarkupError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':'))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(MarkupError::ExpectedName { offset: start });
        }
        Ok(self.src[start..self.pos].to_ascii_lowercase())
    }

    /// Parse children until the close tag of `open`. `depth` is the nesting
    /// level of `open` (0 at top level).
    fn parse_nodes(
        &mut self,
        open: Option<(&str, usize)>,
        depth: usize,
    ) -> Result<Vec<Node>, MarkupError> {
        let mut nodes = Vec::new();
        loop {
            if self.eof() {
                return match open {
                    Some((tag, offset)) => Err(MarkupError::UnclosedElement {
                        tag: tag.to_string(),
                        offset,
                    }),
                    None => Ok(nodes),
                };
            }

            if self.starts_with("</") {
                let offset = self.pos;
                self.pos += 2;
                let found = self.read_name()?;
                self.skip_whitespace();
                self.expect('>')?;
                return match open {
                    Some((tag, _)) if tag == found => Ok(nodes),
                    Some((tag, _)) => Err(MarkupError::MismatchedClose {
                        expected: tag.to_string(),
                        found,
                        offset,
                    }),
                    None => Err(MarkupError::UnexpectedClose { tag: found, offset }),
                };
            }

            if self.starts_with("<!--") {
                let offset = self.pos;
                match self.rest()[4..].find("-->") {
                    Some(end) => self.pos += 4 + end + 3,
                    None => return Err(MarkupError::UnterminatedComment { offset }),
                }
                continue;
            }

            if self.starts_with("<") {
                nodes.push(Node::Element(self.parse_element(depth + 1)?));
                continue;
            }

            let end = self.rest().find('<').unwrap_or(self.rest().len());
            let text = decode_entities(&self.rest()[..end]);
            self.pos += end;
            // Comments can split text runs; keep adjacent text merged.
            match nodes.last_mut() {
                Some(Node::Text(prev)) => prev.push_str(&text),
                _ => nodes.push(Node::Text(text)),
            }
        }
    }

    fn parse_element(&mut self, depth: usize) -> Result<Element, MarkupError> {
        let offset = self.pos;
        if depth > MAX_DEPTH {
            return Err(MarkupError::TooDeep { offset });
        }
        self.expect('<')?;
        let mut element = Element::new(self.read_name()?);

        loop {
            self.skip_whitespace();
            if self.eof() {
                return Err(MarkupError::UnterminatedTag { offset });
            }
            if self.starts_with("/>") {
                self.pos += 2;
                return Ok(element);
            }
            if self.starts_with(">") {
                self.pos += 1;
                break;
            }
            let name = self.read_name()?;
            self.skip_whitespace();
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_whitespace();
                self.read_attr_value()?
            } else {
                name.clone()
            };
            element.set_attr(name, value);
        }

        if element.is_void() {
            return Ok(element);
        }
        let tag = element.tag.clone();
        element.children = self.parse_nodes(Some((&tag, offset)), depth)?;
        Ok(element)
    }

    fn read_attr_value(&mut self) -> Result<String, MarkupError> {
        let offset = self.pos;
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let Some(len) = self.rest().find(quote as char) else {
                    return Err(MarkupError::UnterminatedAttribute { offset });
                };
                let raw = &self.rest()[..len];
                let value = decode_entities(raw);
                self.pos += len + 1;
                Ok(value)
            }
            Some(_) => {
                let len = self
                    .rest()
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(self.rest().len());
                let raw = self.rest()[..len].trim_end_matches('/');
                let value = decode_entities(raw);
                self.pos += raw.len();
                Ok(value)
            }
            None => Err(MarkupError::UnterminatedTag { offset }),
        }
    }
}
