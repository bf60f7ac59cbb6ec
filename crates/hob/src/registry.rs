// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::rc::Rc;

use crate::component::Component;

/// Selector to component lookup, case-insensitive.
#[derive(Clone, Default)]
pub struct Registry {
    components: HashMap<String, Rc<Component>>,
}

impl Registry {
    pub fn new<I>(components: I) -> Self
    where
        I: IntoIterator<Item = Component>,
    {
        let mut registry = Registry::default();

        for component in components {
            registry.register(component);
        }

        registry
    }

    pub fn register(&mut self, component: Component) {
        let selector = component.selector().to_owned();

        if self.components.insert(selector.clone(), Rc::new(component)).is_some() {
            log::warn!("component <{selector}> registered twice, the last registration wins");
        }
    }

    pub fn get(&self, tag: &str) -> Option<&Rc<Component>> {
        match self.components.get(tag) {
            Some(component) => Some(component),
            None => self.components.get(&tag.to_ascii_lowercase()),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
