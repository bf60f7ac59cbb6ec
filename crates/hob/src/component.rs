// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Component registration
//!
//! A [`Component`] ties a selector (the tag name it is used under) to a
//! template, an initial state, named methods for `on-*` bindings, watchers and
//! an optional change hook. The template is parsed once, here, and shared by
//! every instance.
//!
//! ```
//! use hob::prelude::*;
//! use serde_json::json;
//!
//! let counter = Component::new("counter", r#"<button on-click="inc()">+</button>"#)
//!     .unwrap()
//!     .state(|| json!({ "count": 0 }))
//!     .method("inc", |this: &Reactive| {
//!         this.update("count", |n| json!(n.as_i64().unwrap_or(0) + 1))
//!             .map(drop)
//!     })
//!     .watch("count", |_: &Reactive, previous: &Value, current: &Value| {
//!         log::info!("count went from {previous} to {current}");
//!     });
//!
//! assert_eq!(counter.selector(), "counter");
//! assert!(counter.has_method("inc"));
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::outcome::Outcome;
use crate::reactive::{Behavior, Change, Reactive};
use crate::scheduler::Scheduler;
use crate::template::{self, Node};

pub type Method = Rc<dyn Fn(&Reactive)>;

/// Registration record of a component.
#[derive(Clone)]
pub struct Component {
    selector: String,
    template: Rc<[Node]>,
    init: Rc<dyn Fn() -> Value>,
    methods: HashMap<String, Method>,
    behavior: Rc<Behavior>,
}

impl Component {
    /// Register a component under `selector`, parsing its `template`.
    pub fn new(selector: impl Into<String>, template: &str) -> Result<Self, Error> {
        let selector = selector.into().to_ascii_lowercase();
        let nodes = template::parse(template)?;

        log::debug!("registered <{selector}> with {} top-level template nodes", nodes.len());

        Ok(Component {
            selector,
            template: nodes.into(),
            init: Rc::new(|| Value::Object(Map::new())),
            methods: HashMap::new(),
            behavior: Rc::new(Behavior::new()),
        })
    }

    /// Factory for the initial state of every instance.
    pub fn state<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        self.init = Rc::new(init);
        self
    }

    /// Initial state from any serializable value, converted once.
    pub fn state_from<T: Serialize>(self, state: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(state)?;

        Ok(self.state(move || value.clone()))
    }

    /// Method that `on-<event>="name()"` bindings can call.
    pub fn method<F, O>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Reactive) -> O + 'static,
        O: Outcome,
    {
        let name = name.into();
        let context = format!("<{}> method `{name}`", self.selector);

        self.methods
            .insert(name, Rc::new(move |this: &Reactive| method(this).report(&context)));
        self
    }

    /// Call `watcher` with `(previous, current)` whenever `path` changes.
    pub fn watch<F, O>(mut self, path: impl Into<String>, watcher: F) -> Self
    where
        F: Fn(&Reactive, &Value, &Value) -> O + 'static,
        O: Outcome,
    {
        let path = path.into();
        let context = format!("<{}> watcher of `{path}`", self.selector);

        Rc::make_mut(&mut self.behavior).watch(
            path,
            Rc::new(move |this: &Reactive, previous: &Value, current: &Value| {
                watcher(this, previous, current).report(&context)
            }),
        );
        self
    }

    /// Hook called after every effective write, once the current turn is over.
    pub fn on_changes<F, O>(mut self, hook: F) -> Self
    where
        F: Fn(&Reactive, &Change) -> O + 'static,
        O: Outcome,
    {
        let context = format!("<{}> change hook", self.selector);

        Rc::make_mut(&mut self.behavior).set_change_hook(Rc::new(
            move |this: &Reactive, change: &Change| hook(this, change).report(&context),
        ));
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn template(&self) -> &[Node] {
        &self.template
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_handle(&self, name: &str) -> Option<Method> {
        self.methods.get(name).cloned()
    }

    /// Paths watched by this component.
    pub fn watched_paths(&self) -> impl Iterator<Item = &str> {
        self.behavior.watched_paths()
    }

    /// Build a fresh instance: construct the plain state, then wrap it.
    pub fn instantiate(&self, scheduler: Rc<dyn Scheduler>) -> Reactive {
        let data = (self.init)();

        Reactive::with_behavior(data, self.behavior.clone(), scheduler)
    }
}
