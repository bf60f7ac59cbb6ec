// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory document for headless rendering.
//!
//! [`MemoryDom`] implements [`Dom`] over a plain tree of reference counted
//! nodes. Events are dispatched by hand and deferred change hooks run when
//! [`MemoryDom::run_pending`] is called, which makes it the document used by
//! the test suite.
//!
//! ```
//! use hob::prelude::*;
//! use hob::memory::MemoryDom;
//! use serde_json::json;
//!
//! let dom = MemoryDom::new();
//! let root = dom.element("hello");
//!
//! let hello = Component::new("hello", r#"<h1 bind-innerText="name"/>"#)
//!     .unwrap()
//!     .state(|| json!({ "name": "World" }));
//!
//! let module = Module::new([hello], root.clone(), dom).unwrap();
//!
//! assert_eq!(root.to_html(), "<hello><h1>World</h1></hello>");
//!
//! module.state().set("name", "Hob").unwrap();
//!
//! assert_eq!(root.text_content(), "Hob");
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::dom::Dom;
use crate::error::Error;
use crate::scheduler::{Scheduler, TaskQueue};
use crate::value;

type Callback = Rc<RefCell<Box<dyn FnMut()>>>;

struct Listener {
    id: u64,
    event: String,
    callback: Callback,
}

enum Kind {
    Element(String),
    Text(String),
}

struct NodeData {
    kind: Kind,
    properties: BTreeMap<String, Value>,
    children: Vec<MemoryNode>,
    listeners: Vec<Listener>,
}

/// Handle to a node of a [`MemoryDom`]. Clones point at the same node.
#[derive(Clone)]
pub struct MemoryNode(Rc<RefCell<NodeData>>);

#[derive(Clone, Default)]
pub struct MemoryDom {
    queue: TaskQueue,
    mutations: Rc<Cell<usize>>,
    next_listener: Rc<Cell<u64>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        MemoryDom::default()
    }

    /// Create a detached element, for use as a mount root. This does not
    /// count as a mutation.
    pub fn element(&self, tag: &str) -> MemoryNode {
        MemoryNode::new(Kind::Element(tag.to_owned()))
    }

    /// Number of creations, appends and property writes performed through
    /// the [`Dom`] trait.
    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    /// Run deferred change hooks. Returns the number of tasks that ran.
    pub fn run_pending(&self) -> usize {
        self.queue.run_pending()
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    fn mutate(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

fn valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();

    chars.next().map_or(false, |c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

impl Dom for MemoryDom {
    type Node = MemoryNode;
    type Listener = MemoryListener;

    fn tag_name(&self, node: &MemoryNode) -> String {
        node.tag()
    }

    fn create_element(&self, tag: &str) -> Result<MemoryNode, Error> {
        if !valid_tag(tag) {
            return Err(Error::Host(format!("invalid element name `{tag}`")));
        }
        self.mutate();

        Ok(MemoryNode::new(Kind::Element(tag.to_owned())))
    }

    fn create_text(&self, content: &str) -> MemoryNode {
        self.mutate();

        MemoryNode::new(Kind::Text(content.to_owned()))
    }

    fn append(&self, parent: &MemoryNode, child: &MemoryNode) -> Result<(), Error> {
        if Rc::ptr_eq(&parent.0, &child.0) {
            return Err(Error::Host(String::from("cannot append a node to itself")));
        }
        if let Kind::Text(_) = parent.0.borrow().kind {
            return Err(Error::Host(String::from("text nodes cannot have children")));
        }
        self.mutate();

        parent.0.borrow_mut().children.push(child.clone());

        Ok(())
    }

    fn set_property(&self, node: &MemoryNode, name: &str, value: &Value) -> Result<(), Error> {
        self.mutate();

        let mut data = node.0.borrow_mut();

        match name {
            // Text properties replace the children, as they do in a browser
            "innerText" | "textContent" => {
                let text = MemoryNode::new(Kind::Text(value::to_text(value).into_owned()));
                data.children = vec![text];
            }
            _ => {
                data.properties.insert(name.to_owned(), value.clone());
            }
        }

        Ok(())
    }

    fn input_value(&self, node: &MemoryNode) -> String {
        node.value()
    }

    fn listen(&self, node: &MemoryNode, event: &str, callback: Box<dyn FnMut()>) -> MemoryListener {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);

        node.0.borrow_mut().listeners.push(Listener {
            id,
            event: event.to_owned(),
            callback: Rc::new(RefCell::new(callback)),
        });

        MemoryListener {
            node: Rc::downgrade(&node.0),
            id,
        }
    }

    fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::new(self.queue.clone())
    }
}

/// Detaches its event listener when dropped.
pub struct MemoryListener {
    node: Weak<RefCell<NodeData>>,
    id: u64,
}

impl Drop for MemoryListener {
    fn drop(&mut self) {
        if let Some(node) = self.node.upgrade() {
            node.borrow_mut().listeners.retain(|listener| listener.id != self.id);
        }
    }
}

impl MemoryNode {
    fn new(kind: Kind) -> Self {
        MemoryNode(Rc::new(RefCell::new(NodeData {
            kind,
            properties: BTreeMap::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        })))
    }

    /// Tag name, or `#text` for text nodes.
    pub fn tag(&self) -> String {
        match &self.0.borrow().kind {
            Kind::Element(tag) => tag.clone(),
            Kind::Text(_) => String::from(crate::template::TEXT_TAG),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, Kind::Text(_))
    }

    pub fn children(&self) -> Vec<MemoryNode> {
        self.0.borrow().children.clone()
    }

    pub fn property(&self, name: &str) -> Option<Value> {
        self.0.borrow().properties.get(name).cloned()
    }

    /// Current `value` property as text.
    pub fn value(&self) -> String {
        self.property("value")
            .map(|value| value::to_text(&value).into_owned())
            .unwrap_or_default()
    }

    /// Change the `value` property the way typing into an input would,
    /// without dispatching any event.
    pub fn set_value(&self, text: &str) {
        self.0
            .borrow_mut()
            .properties
            .insert(String::from("value"), Value::String(text.to_owned()));
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.0.borrow();

        match &data.kind {
            Kind::Text(text) => out.push_str(text),
            Kind::Element(_) => {
                for child in &data.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Invoke every listener registered for `event`, in registration order.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &str) -> usize {
        let callbacks: Vec<Callback> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.event == event)
            .map(|listener| listener.callback.clone())
            .collect();

        let mut invoked = 0;

        for callback in callbacks {
            // A listener re-dispatching its own event is not re-entered
            if let Ok(mut callback) = callback.try_borrow_mut() {
                let callback: &mut dyn FnMut() = &mut **callback;
                callback();
                invoked += 1;
            }
        }

        invoked
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    /// First node with `tag` in depth-first document order, this node included.
    pub fn find(&self, tag: &str) -> Option<MemoryNode> {
        if self.tag().eq_ignore_ascii_case(tag) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find(tag))
    }

    /// All descendants with `tag` in depth-first document order, this node included.
    pub fn find_all(&self, tag: &str) -> Vec<MemoryNode> {
        let mut found = Vec::new();
        self.collect(tag, &mut found);
        found
    }

    fn collect(&self, tag: &str, found: &mut Vec<MemoryNode>) {
        if self.tag().eq_ignore_ascii_case(tag) {
            found.push(self.clone());
        }
        for child in self.children() {
            child.collect(tag, found);
        }
    }

    pub fn ptr_eq(&self, other: &MemoryNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Serialize the subtree. Properties are written as attributes in name
    /// order, `className` as `class`, `false` and `null` are omitted.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();

        let tag = match &data.kind {
            Kind::Text(text) => return escape(text, out),
            Kind::Element(tag) => tag,
        };

        out.push('<');
        out.push_str(tag);

        for (name, value) in &data.properties {
            let name = match name.as_str() {
                "className" => "class",
                name => name,
            };

            match value {
                Value::Null | Value::Bool(false) => {}
                Value::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                value => {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape(&value::to_text(value), out);
                    out.push('"');
                }
            }
        }

        out.push('>');

        for child in &data.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
