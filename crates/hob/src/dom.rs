// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The host document the renderer builds into.

use std::rc::Rc;

use serde_json::Value;

use crate::error::Error;
use crate::scheduler::Scheduler;

/// Primitives of a host document.
///
/// Implemented by [`WebDom`](crate::web::WebDom) for the browser and by
/// [`MemoryDom`](crate::memory::MemoryDom) for headless rendering.
pub trait Dom: Clone + 'static {
    /// Handle to an element or text node.
    type Node: Clone + 'static;

    /// Keeps an event listener attached. Dropping it detaches the listener.
    type Listener: 'static;

    /// Tag name of an element, in whatever case the host reports it.
    fn tag_name(&self, node: &Self::Node) -> String;

    fn create_element(&self, tag: &str) -> Result<Self::Node, Error>;

    fn create_text(&self, content: &str) -> Self::Node;

    fn append(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Error>;

    /// Set a DOM property (not an attribute) such as `value`, `hidden` or `className`.
    fn set_property(&self, node: &Self::Node, name: &str, value: &Value) -> Result<(), Error>;

    /// Current value of an `<input>` element.
    fn input_value(&self, node: &Self::Node) -> String;

    /// Call `callback` for every `event` dispatched on `node`, in arrival order.
    fn listen(&self, node: &Self::Node, event: &str, callback: Box<dyn FnMut()>) -> Self::Listener;

    /// Scheduler for the deferred change hooks of instances rendered here.
    fn scheduler(&self) -> Rc<dyn Scheduler>;
}
