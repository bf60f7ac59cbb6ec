// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interpretation of template attributes.
//!
//! | Attribute               | Binding                                   |
//! |-------------------------|-------------------------------------------|
//! | `on-click="inc()"`      | [`Binding::Listen`], arguments ignored    |
//! | `bind-model="user.name"`| [`Binding::Model`], `<input>` only        |
//! | `bind-hidden="flag"`    | [`Binding::Property`] kept in sync        |
//! | `class="alert"`         | [`Binding::Static`] as `className`        |

use crate::template::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<'a> {
    /// Call `method` on the component for every `event`.
    Listen { event: &'a str, method: &'a str },
    /// Two-way binding between an input's value and `path`.
    Model { path: &'a str },
    /// One-way binding of a DOM property to `path`.
    Property { property: &'a str, path: &'a str },
    /// Literal DOM property.
    Static { property: &'a str, value: &'a str },
}

impl<'a> Binding<'a> {
    pub fn from_attribute(attr: &'a Attribute) -> Self {
        let name = attr.name.as_str();
        let value = attr.value.as_str();

        if let Some(event) = name.strip_prefix("on-") {
            return Binding::Listen {
                event,
                method: method_name(value),
            };
        }
        if name == "bind-model" {
            return Binding::Model { path: value.trim() };
        }
        if let Some(property) = name.strip_prefix("bind-") {
            return Binding::Property {
                property,
                path: value.trim(),
            };
        }

        let property = match name {
            "class" => "className",
            name => name,
        };

        Binding::Static { property, value }
    }
}

/// Name part of a call expression such as `greet()` or `greet('you')`.
fn method_name(call: &str) -> &str {
    let name = match call.find('(') {
        Some(paren) => &call[..paren],
        None => call,
    };

    name.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn listeners() {
        let click = attr("on-click", "changeContent()");
        let args = attr("on-mouseover", " greet('you', 2) ");
        let bare = attr("on-input", "touch");

        assert_eq!(
            Binding::from_attribute(&click),
            Binding::Listen {
                event: "click",
                method: "changeContent"
            }
        );
        assert_eq!(
            Binding::from_attribute(&args),
            Binding::Listen {
                event: "mouseover",
                method: "greet"
            }
        );
        assert_eq!(
            Binding::from_attribute(&bare),
            Binding::Listen {
                event: "input",
                method: "touch"
            }
        );
    }

    #[test]
    fn bindings() {
        let model = attr("bind-model", "hello");
        let prop = attr("bind-innerText", "user.name");

        assert_eq!(Binding::from_attribute(&model), Binding::Model { path: "hello" });
        assert_eq!(
            Binding::from_attribute(&prop),
            Binding::Property {
                property: "innerText",
                path: "user.name"
            }
        );
    }

    #[test]
    fn statics() {
        let class = attr("class", "alert");
        let style = attr("style", "background-color: aqua");

        assert_eq!(
            Binding::from_attribute(&class),
            Binding::Static {
                property: "className",
                value: "alert"
            }
        );
        assert_eq!(
            Binding::from_attribute(&style),
            Binding::Static {
                property: "style",
                value: "background-color: aqua"
            }
        );
    }
}
