// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Reactive component state
//!
//! A [`Reactive`] owns a [`Value`] tree and funnels every write through
//! [`Reactive::set`]. An effective write (one that changes the stored value)
//! produces a [`Change`] record that is:
//!
//! 1. published to the instance's replay-latest [`Subject`],
//! 2. handed to the change hook of the [`Behavior`], deferred through the
//!    [`Scheduler`] so it never runs inside the write,
//! 3. passed as `(previous, current)` to every watcher of that exact path.
//!
//! Nested objects are reached through [`Lens`]es, stand-ins that carry the
//! path prefix so changes always report the fully-qualified dotted path.
//!
//! ```
//! use std::rc::Rc;
//! use hob::reactive::Reactive;
//! use hob::scheduler::TaskQueue;
//! use serde_json::json;
//!
//! let state = Reactive::new(json!({ "user": { "name": "Armen" } }), Rc::new(TaskQueue::new()));
//!
//! let user = state.at("user").unwrap();
//! assert!(user.set("name", "Vardanyan").unwrap());
//!
//! let change = state.latest_change().unwrap();
//! assert_eq!(change.path, "user.name");
//! assert_eq!(change.previous, "Armen");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::path::{self, PathError};
use crate::scheduler::Scheduler;
use crate::subject::{Subject, Subscription};

/// Record of a single effective write.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: String,
    pub previous: Value,
    pub current: Value,
}

pub type Watcher = Rc<dyn Fn(&Reactive, &Value, &Value)>;

pub type ChangeHook = Rc<dyn Fn(&Reactive, &Change)>;

/// Reactions attached to every instance of a component: watchers keyed by
/// dotted path, and the deferred change hook.
#[derive(Clone, Default)]
pub struct Behavior {
    watchers: HashMap<String, Vec<Watcher>>,
    on_changes: Option<ChangeHook>,
}

impl Behavior {
    pub fn new() -> Self {
        Behavior::default()
    }

    pub fn watch(&mut self, path: impl Into<String>, watcher: Watcher) {
        self.watchers.entry(path.into()).or_default().push(watcher);
    }

    pub fn set_change_hook(&mut self, hook: ChangeHook) {
        self.on_changes = Some(hook);
    }

    pub fn has_change_hook(&self) -> bool {
        self.on_changes.is_some()
    }

    /// Paths that have at least one watcher.
    pub fn watched_paths(&self) -> impl Iterator<Item = &str> {
        self.watchers.keys().map(String::as_str)
    }

    fn watchers(&self, path: &str) -> &[Watcher] {
        self.watchers.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

struct Inner {
    data: RefCell<Value>,
    changes: Subject<Change>,
    behavior: Rc<Behavior>,
    scheduler: Rc<dyn Scheduler>,
}

/// Shared handle to reactive state. Cloning is cheap, clones share the state.
#[derive(Clone)]
pub struct Reactive {
    inner: Rc<Inner>,
}

/// Result of reading a single property through a [`Reactive`] or [`Lens`].
pub enum Field {
    /// Objects and arrays come back wrapped, so writes through them are observed.
    Nested(Lens),
    /// Primitives and `null` come back as plain values.
    Value(Value),
}

impl Field {
    pub fn into_lens(self) -> Option<Lens> {
        match self {
            Field::Nested(lens) => Some(lens),
            Field::Value(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Field::Nested(lens) => lens.snapshot(),
            Field::Value(value) => value,
        }
    }
}

impl Reactive {
    pub fn new(data: Value, scheduler: Rc<dyn Scheduler>) -> Self {
        Reactive::with_behavior(data, Rc::new(Behavior::default()), scheduler)
    }

    pub fn with_behavior(
        data: Value,
        behavior: Rc<Behavior>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Reactive {
            inner: Rc::new(Inner {
                data: RefCell::new(data),
                changes: Subject::new(),
                behavior,
                scheduler,
            }),
        }
    }

    /// Clone of the value at `path`.
    pub fn get(&self, path: &str) -> Result<Value, PathError> {
        path::get(path, &self.inner.data.borrow()).cloned()
    }

    /// Read a property: nested values are wrapped in a [`Lens`], primitives
    /// are returned as they are.
    pub fn field(&self, path: &str) -> Result<Field, PathError> {
        let data = self.inner.data.borrow();
        let value = path::get(path, &data)?;

        if path::is_nested(value) {
            Ok(Field::Nested(Lens {
                root: self.clone(),
                prefix: path.to_owned(),
            }))
        } else {
            Ok(Field::Value(value.clone()))
        }
    }

    /// Wrapped stand-in for the object or array at `path`.
    pub fn at(&self, path: &str) -> Result<Lens, PathError> {
        match self.field(path)? {
            Field::Nested(lens) => Ok(lens),
            Field::Value(_) => Err(not_an_object(path)),
        }
    }

    /// Write `value` at `path`. Returns `true` if the stored value changed.
    ///
    /// Must not be called from within [`read`](Reactive::read).
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<bool, PathError> {
        let current = value.into();

        let previous = {
            let mut data = self.inner.data.borrow_mut();
            let slot = path::slot_mut(path, &mut data)?;

            if *slot == current {
                return Ok(false);
            }

            std::mem::replace(slot, current.clone())
        };

        log::trace!("{path} has been changed from {previous} to {current}");

        self.notify(Change {
            path: path.to_owned(),
            previous,
            current,
        });

        Ok(true)
    }

    /// Compute a new value at `path` from the current one and write it.
    pub fn update<F>(&self, path: &str, f: F) -> Result<bool, PathError>
    where
        F: FnOnce(&Value) -> Value,
    {
        let next = f(&self.get(path)?);

        self.set(path, next)
    }

    fn notify(&self, change: Change) {
        self.inner.changes.next(change.clone());

        if let Some(hook) = self.inner.behavior.on_changes.clone() {
            let weak: Weak<Inner> = Rc::downgrade(&self.inner);
            let change = change.clone();

            self.inner.scheduler.defer(Box::new(move || {
                // The instance may have been unmounted in the meantime
                if let Some(inner) = weak.upgrade() {
                    log::trace!("running change hook for {}", change.path);
                    hook(&Reactive { inner }, &change);
                }
            }));
        }

        for watcher in self.inner.behavior.watchers(&change.path) {
            watcher(self, &change.previous, &change.current);
        }
    }

    /// Subscribe to change records. The subscriber is immediately called with
    /// the latest change, or `None` before the first change.
    #[must_use = "dropping a Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(Option<&Change>) + 'static,
    {
        self.inner.changes.subscribe(subscriber)
    }

    pub fn latest_change(&self) -> Option<Change> {
        self.inner.changes.latest()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.changes.subscriber_count()
    }

    /// Borrow the whole state tree.
    ///
    /// Writing to this `Reactive` from inside `f` panics.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Value) -> R,
    {
        f(&self.inner.data.borrow())
    }

    /// Clone of the whole state tree.
    pub fn snapshot(&self) -> Value {
        self.inner.data.borrow().clone()
    }

    pub fn behavior(&self) -> &Behavior {
        &self.inner.behavior
    }

    /// Whether both handles point at the same state.
    pub fn ptr_eq(&self, other: &Reactive) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn not_an_object(path: &str) -> PathError {
    match path.rsplit_once('.') {
        Some((parent, segment)) => PathError::NotAnObject {
            parent: parent.to_owned(),
            segment: segment.to_owned(),
        },
        None => PathError::NotAnObject {
            parent: String::from("<root>"),
            segment: path.to_owned(),
        },
    }
}

/// Stand-in for a nested object inside a [`Reactive`]. All paths are relative
/// to the lens prefix, and writes report the fully-qualified path.
#[derive(Clone)]
pub struct Lens {
    root: Reactive,
    prefix: String,
}

impl Lens {
    /// Fully-qualified path of this lens.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn root(&self) -> &Reactive {
        &self.root
    }

    pub fn get(&self, path: &str) -> Result<Value, PathError> {
        self.root.get(&path::join(&self.prefix, path))
    }

    pub fn field(&self, path: &str) -> Result<Field, PathError> {
        self.root.field(&path::join(&self.prefix, path))
    }

    pub fn at(&self, path: &str) -> Result<Lens, PathError> {
        self.root.at(&path::join(&self.prefix, path))
    }

    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<bool, PathError> {
        self.root.set(&path::join(&self.prefix, path), value)
    }

    pub fn update<F>(&self, path: &str, f: F) -> Result<bool, PathError>
    where
        F: FnOnce(&Value) -> Value,
    {
        self.root.update(&path::join(&self.prefix, path), f)
    }

    /// Clone of the nested value, or `null` if it no longer exists.
    pub fn snapshot(&self) -> Value {
        self.root.get(&self.prefix).unwrap_or(Value::Null)
    }
}
