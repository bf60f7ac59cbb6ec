// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Mounting and rendering
//!
//! [`Module::new`] looks up the component registered under the root element's
//! tag and renders its template into the root:
//!
//! * tags of registered components get a container element and a fresh
//!   instance of that component,
//! * text nodes are copied verbatim,
//! * other elements are created with their attributes interpreted as
//!   [`Binding`]s against the instance that owns the template.
//!
//! The rendered top-level nodes are only attached to the root once the whole
//! tree has been built, so a failing render leaves the root untouched.

use std::rc::Rc;

use serde_json::Value;

use crate::binding::Binding;
use crate::component::Component;
use crate::dom::Dom;
use crate::error::Error;
use crate::path;
use crate::reactive::{Change, Reactive};
use crate::registry::Registry;
use crate::subject::Subscription;
use crate::template::{Element, Node};

/// A mounted component instance together with everything that keeps its
/// bindings alive.
pub struct Instance<D: Dom> {
    selector: String,
    state: Reactive,
    container: D::Node,
    subscriptions: Vec<Subscription>,
    listeners: Vec<D::Listener>,
}

impl<D: Dom> Instance<D> {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn state(&self) -> &Reactive {
        &self.state
    }

    /// Element the instance rendered into.
    pub fn container(&self) -> &D::Node {
        &self.container
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// A rendered component tree.
///
/// Dropping the module (or calling [`unmount`](Module::unmount)) releases all
/// subscriptions and detaches all event listeners. The DOM nodes stay where
/// they are.
pub struct Module<D: Dom> {
    dom: D,
    root: D::Node,
    registry: Registry,
    instances: Vec<Instance<D>>,
}

impl<D: Dom> Module<D> {
    /// Register `components` and render the one matching `root`'s tag into it.
    pub fn new<I>(components: I, root: D::Node, dom: D) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Component>,
    {
        let registry = Registry::new(components);

        log::debug!("mounting with components: {:?}", registry.selectors().collect::<Vec<_>>());

        let tag = dom.tag_name(&root).to_ascii_lowercase();

        let component = match registry.get(&tag) {
            Some(component) => component.clone(),
            None => return Err(Error::UnknownRoot { tag }),
        };

        let mut renderer = Renderer {
            dom: &dom,
            registry: &registry,
            instances: Vec::new(),
            stack: Vec::new(),
        };

        let nodes = renderer.component(&component, &root)?;

        for node in &nodes {
            dom.append(&root, node)?;
        }

        let instances = renderer.instances;

        log::debug!("mounted <{tag}> with {} component instances", instances.len());

        Ok(Module {
            dom,
            root,
            registry,
            instances,
        })
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn root(&self) -> &D::Node {
        &self.root
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// State of the root component instance.
    pub fn state(&self) -> &Reactive {
        // Rendering always creates the root instance first
        &self.instances[0].state
    }

    /// All instances in document order, the root first.
    pub fn instances(&self) -> &[Instance<D>] {
        &self.instances
    }

    pub fn instances_of<'a>(
        &'a self,
        selector: &'a str,
    ) -> impl Iterator<Item = &'a Instance<D>> + 'a {
        self.instances
            .iter()
            .filter(move |instance| instance.selector.eq_ignore_ascii_case(selector))
    }

    /// Release every subscription and listener of every instance.
    pub fn unmount(self) {
        log::debug!("unmounting {} component instances", self.instances.len());
    }
}

struct Renderer<'a, D: Dom> {
    dom: &'a D,
    registry: &'a Registry,
    instances: Vec<Instance<D>>,
    /// Selectors of the components currently being rendered.
    stack: Vec<String>,
}

impl<'a, D: Dom> Renderer<'a, D> {
    /// Render a fresh instance of `component`. Returns the top-level nodes,
    /// which the caller attaches to `container`.
    fn component(
        &mut self,
        component: &Rc<Component>,
        container: &D::Node,
    ) -> Result<Vec<D::Node>, Error> {
        let selector = component.selector();

        if self.stack.iter().any(|s| s == selector) {
            return Err(Error::Recursive {
                selector: selector.to_owned(),
            });
        }

        let mut instance = Instance {
            selector: selector.to_owned(),
            state: component.instantiate(self.dom.scheduler()),
            container: container.clone(),
            subscriptions: Vec::new(),
            listeners: Vec::new(),
        };

        // Keep instances in document order: parent before its nested components
        let index = self.instances.len();

        self.stack.push(selector.to_owned());

        let mut nodes = Vec::with_capacity(component.template().len());

        for node in component.template() {
            nodes.push(self.node(node, component, &mut instance)?);
        }

        self.stack.pop();
        self.instances.insert(index, instance);

        Ok(nodes)
    }

    fn node(
        &mut self,
        node: &Node,
        component: &Component,
        instance: &mut Instance<D>,
    ) -> Result<D::Node, Error> {
        let el = match node {
            Node::Text(content) => return Ok(self.dom.create_text(content)),
            Node::Element(el) => el,
        };

        let registry = self.registry;

        if let Some(nested) = registry.get(&el.tag) {
            let container = self.dom.create_element(&el.tag)?;

            for child in self.component(nested, &container)? {
                self.dom.append(&container, &child)?;
            }

            return Ok(container);
        }

        let element = self.dom.create_element(&el.tag)?;

        for attr in &el.attributes {
            self.bind(Binding::from_attribute(attr), el, &element, component, instance)?;
        }

        for child in &el.children {
            let child = self.node(child, component, instance)?;

            self.dom.append(&element, &child)?;
        }

        Ok(element)
    }

    fn bind(
        &self,
        binding: Binding,
        el: &Element,
        element: &D::Node,
        component: &Component,
        instance: &mut Instance<D>,
    ) -> Result<(), Error> {
        let state = &instance.state;

        match binding {
            Binding::Listen { event, method } => {
                let handler = component.method_handle(method).ok_or_else(|| Error::UnknownMethod {
                    selector: component.selector().to_owned(),
                    method: method.to_owned(),
                })?;

                let state = state.clone();
                let listener = self.dom.listen(element, event, Box::new(move || handler(&state)));

                instance.listeners.push(listener);
            }
            Binding::Model { path } => {
                if !el.tag.eq_ignore_ascii_case("input") {
                    return Err(Error::ModelOnNonInput { tag: el.tag.clone() });
                }

                let subscription = self.sync(state, path, element, "value")?;

                let dom = self.dom.clone();
                let target = element.clone();
                let writer = state.clone();
                let path = path.to_owned();

                let listener = self.dom.listen(
                    element,
                    "input",
                    Box::new(move || {
                        let value = dom.input_value(&target);

                        if let Err(err) = writer.set(&path, value) {
                            log::error!("cannot write input value to `{path}`: {err}");
                        }
                    }),
                );

                instance.subscriptions.push(subscription);
                instance.listeners.push(listener);
            }
            Binding::Property { property, path } => {
                let subscription = self.sync(state, path, element, property)?;

                instance.subscriptions.push(subscription);
            }
            Binding::Static { property, value } => {
                self.dom
                    .set_property(element, property, &Value::String(value.to_owned()))?;
            }
        }

        Ok(())
    }

    /// Initialise `property` of `element` from `path` and keep it in sync.
    fn sync(
        &self,
        state: &Reactive,
        path: &str,
        element: &D::Node,
        property: &str,
    ) -> Result<Subscription, Error> {
        let value = state.get(path)?;

        self.dom.set_property(element, property, &value)?;

        let dom = self.dom.clone();
        let element = element.clone();
        let property = property.to_owned();
        let path = path.to_owned();

        Ok(state.subscribe(move |change| {
            let value = match change.and_then(|change| affected(change, &path)) {
                Some(value) => value,
                None => return,
            };

            if let Err(err) = dom.set_property(&element, &property, &value) {
                log::error!("cannot update `{property}` from `{path}`: {err}");
            }
        }))
    }
}

/// New value of `path` after `change`, if the change touched it: either the
/// path itself was written, or one of its ancestors was replaced.
fn affected(change: &Change, path: &str) -> Option<Value> {
    if change.path == path {
        return Some(change.current.clone());
    }

    let rest = path.strip_prefix(change.path.as_str())?.strip_prefix('.')?;

    Some(path::get(rest, &change.current).cloned().unwrap_or(Value::Null))
}
