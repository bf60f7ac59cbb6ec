// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Template parsing.
//!
//! Templates are XML fragments. They are parsed once, when a component is
//! registered, into a list of [`Node`]s that every instance of the component
//! renders from.
//!
//! ```
//! use hob::template::{parse, Node};
//!
//! let nodes = parse(r#"<p class="note">Hello <b>there</b></p>"#).unwrap();
//!
//! assert_eq!(nodes.len(), 1);
//! assert_eq!(nodes[0].tag(), "p");
//! assert_eq!(nodes[0].attribute("class"), Some("note"));
//! assert_eq!(nodes[0].children()[0], Node::Text("Hello ".into()));
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Tag reported by [`Node::tag`] for text nodes.
pub const TEXT_TAG: &str = "#text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Node {
    /// Tag name as written in the template, or [`TEXT_TAG`] for text.
    pub fn tag(&self) -> &str {
        match self {
            Node::Element(el) => &el.tag,
            Node::Text(_) => TEXT_TAG,
        }
    }

    /// Text content, `None` for elements.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Text(text) => Some(text),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Node::Element(el) => &el.attributes,
            Node::Text(_) => &[],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Text(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Parse an XML fragment into template nodes.
pub fn parse(markup: &str) -> Result<Vec<Node>, ParseError> {
    let mut reader = Reader::from_str(markup);
    let mut tree = Tree::default();

    loop {
        let pos = reader.buffer_position() as usize;

        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = element(&e).map_err(|message| error_at(markup, pos, message))?;

                tree.open.push((element, pos));
            }
            Ok(Event::Empty(e)) => {
                let element = element(&e).map_err(|message| error_at(markup, pos, message))?;

                tree.push(Node::Element(element));
            }
            Ok(Event::End(_)) => {
                // End names are checked by the reader
                if let Some((element, _)) = tree.open.pop() {
                    tree.push(Node::Element(element));
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| error_at(markup, pos, err.to_string()))?;

                // Whitespace between top-level nodes is not content
                if tree.open.is_empty() && text.trim().is_empty() {
                    continue;
                }
                tree.push(Node::Text(text.into_owned()));
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();

                tree.push(Node::Text(text));
            }
            Ok(Event::Eof) => break,
            // Comments, processing instructions and doctype declarations
            Ok(_) => {}
            Err(err) => {
                return Err(error_at(markup, reader.buffer_position() as usize, err.to_string()));
            }
        }
    }

    if let Some((element, pos)) = tree.open.pop() {
        return Err(error_at(
            markup,
            pos,
            format!("element <{}> is never closed", element.tag),
        ));
    }

    Ok(tree.nodes)
}

#[derive(Default)]
struct Tree {
    nodes: Vec<Node>,
    /// Elements that are still open, with the offset of their start tag.
    open: Vec<(Element, usize)>,
}

impl Tree {
    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some((parent, _)) => parent.children.push(node),
            None => self.nodes.push(node),
        }
    }
}

fn element(start: &BytesStart) -> Result<Element, String> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    // The iterator rejects duplicate and unquoted attributes
    for attr in start.attributes() {
        let attr = attr.map_err(|err| format!("invalid attribute on <{tag}>: {err}"))?;
        let value = attr
            .unescape_value()
            .map_err(|err| format!("invalid attribute value on <{tag}>: {err}"))?;

        attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(Element {
        tag,
        attributes,
        children: Vec::new(),
    })
}

fn error_at(markup: &str, pos: usize, message: impl Into<String>) -> ParseError {
    let mut pos = pos.min(markup.len());

    while !markup.is_char_boundary(pos) {
        pos -= 1;
    }

    let before = &markup[..pos];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;

    ParseError {
        message: message.into(),
        line,
        column,
    }
}
