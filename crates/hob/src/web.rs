// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser DOM through `web-sys`.

use std::mem::ManuallyDrop;
use std::rc::Rc;

use gloo_events::EventListener;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlInputElement, Node};

use crate::component::Component;
use crate::dom::Dom;
use crate::error::Error;
use crate::module::Module;
use crate::scheduler::{NextTick, Scheduler};
use crate::value::to_js;

fn host_error(err: JsValue) -> Error {
    Error::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// Document of the current window.
    pub fn new() -> Result<Self, Error> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| Error::Host(String::from("no document available")))?;

        Ok(WebDom { document })
    }

    pub fn from_document(document: Document) -> Self {
        WebDom { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn element_by_id(&self, id: &str) -> Result<Node, Error> {
        self.document
            .get_element_by_id(id)
            .map(Node::from)
            .ok_or_else(|| Error::Host(format!("no element with id `{id}`")))
    }
}

impl Dom for WebDom {
    type Node = Node;
    type Listener = EventListener;

    fn tag_name(&self, node: &Node) -> String {
        node.node_name()
    }

    fn create_element(&self, tag: &str) -> Result<Node, Error> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(host_error)
    }

    fn create_text(&self, content: &str) -> Node {
        self.document.create_text_node(content).into()
    }

    fn append(&self, parent: &Node, child: &Node) -> Result<(), Error> {
        parent.append_child(child).map(drop).map_err(host_error)
    }

    fn set_property(&self, node: &Node, name: &str, value: &Value) -> Result<(), Error> {
        js_sys::Reflect::set(node.as_ref(), &JsValue::from_str(name), &to_js(value))
            .map(drop)
            .map_err(host_error)
    }

    fn input_value(&self, node: &Node) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn listen(&self, node: &Node, event: &str, mut callback: Box<dyn FnMut()>) -> EventListener {
        EventListener::new(node, event.to_owned(), move |_| callback())
    }

    fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::new(NextTick)
    }
}

/// Mount `components` on the element with id `root_id`. The rendered tree
/// stays bound for the lifetime of the page.
pub fn start<I>(components: I, root_id: &str) -> Result<(), Error>
where
    I: IntoIterator<Item = Component>,
{
    init_panic_hook();

    let dom = WebDom::new()?;
    let root = dom.element_by_id(root_id)?;

    let _ = ManuallyDrop::new(Module::new(components, root, dom)?);

    Ok(())
}

fn init_panic_hook() {
    // Only enable console hook on debug builds
    #[cfg(debug_assertions)]
    {
        use std::cell::Cell;

        thread_local! {
            static INIT: Cell<bool> = Cell::new(false);
        }
        if !INIT.with(|init| init.get()) {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));

            INIT.with(|init| init.set(true));
        }
    }
}
