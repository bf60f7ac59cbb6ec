// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Hob
//!
//! _Reactive components from XML templates._
//!
//! **Hob** renders components described by an XML template and a piece of
//! reactive state. Attributes in the template bind the DOM to the state:
//!
//! * `on-click="inc()"` calls the component method `inc` on every click,
//! * `bind-model="name"` keeps an `<input>` and the `name` field in sync both ways,
//! * `bind-hidden="collapsed"` keeps the `hidden` property in sync with `collapsed`,
//! * any other attribute is set as a literal property, with `class` going to `className`.
//!
//! Tags naming another registered component render a fresh instance of that
//! component in place.
//!
//! ### Counter
//!
//! ```rust
//! use hob::prelude::*;
//! use hob::memory::MemoryDom;
//! use serde_json::json;
//!
//! let counter = Component::new(
//!     "counter",
//!     r#"<p><span bind-innerText="count"/><button on-click="inc()">+</button></p>"#,
//! )
//! .unwrap()
//! .state(|| json!({ "count": 0 }))
//! .method("inc", |this: &Reactive| {
//!     this.update("count", |n| json!(n.as_i64().unwrap_or(0) + 1)).map(drop)
//! });
//!
//! let dom = MemoryDom::new();
//! let root = dom.element("counter");
//! let _module = Module::new([counter], root.clone(), dom).unwrap();
//!
//! let button = root.find("button").unwrap();
//! button.dispatch("click");
//! button.dispatch("click");
//!
//! assert_eq!(root.find("span").unwrap().text_content(), "2");
//! ```
//!
//! In the browser use [`web::start`](crate::web::start) to mount on an element by id.

pub mod binding;
pub mod component;
pub mod dom;
pub mod error;
pub mod memory;
pub mod module;
pub mod outcome;
pub mod path;
pub mod reactive;
pub mod registry;
pub mod scheduler;
pub mod subject;
pub mod template;
pub mod value;

#[cfg(feature = "web")]
pub mod web;

pub use error::{Error, Result};

/// The prelude module with most commonly used types.
pub mod prelude {
    pub use crate::component::Component;
    pub use crate::dom::Dom;
    pub use crate::error::Error;
    pub use crate::module::Module;
    pub use crate::reactive::{Change, Field, Lens, Reactive};
    pub use serde_json::Value;
}
