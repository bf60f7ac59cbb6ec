// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dotted path access into a [`Value`](serde_json::Value) tree.
//!
//! A path such as `user.profile.name` is split on `.` and every segment is
//! resolved in turn: objects by key, arrays by decimal index.
//!
//! ```
//! use hob::path;
//! use serde_json::json;
//!
//! let mut state = json!({ "user": { "name": "Armen" } });
//!
//! assert_eq!(path::get("user.name", &state).unwrap(), &json!("Armen"));
//!
//! let previous = path::set("user.name", &mut state, json!("Vardanyan")).unwrap();
//!
//! assert_eq!(previous, "Armen");
//! assert_eq!(state["user"]["name"], "Vardanyan");
//! ```

use serde_json::Value;
use thiserror::Error;

/// Failure to resolve a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty segment in property path `{0}`")]
    Empty(String),
    #[error("cannot read `{segment}` of `{parent}`: not an object")]
    NotAnObject { parent: String, segment: String },
    #[error("property `{0}` does not exist")]
    Missing(String),
}

/// Fully-qualified path of `path` relative to `prefix`.
pub fn join(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_owned(),
        (_, true) => prefix.to_owned(),
        _ => format!("{prefix}.{path}"),
    }
}

fn segments(path: &str) -> Result<Vec<&str>, PathError> {
    let segments: Vec<&str> = path.split('.').collect();

    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(PathError::Empty(path.to_owned()));
    }

    Ok(segments)
}

/// Path made of the first `n` segments, for error reporting.
fn parent(segments: &[&str], n: usize) -> String {
    if n == 0 {
        return String::from("<root>");
    }
    segments[..n].join(".")
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

/// Whether the value can hold named or indexed children.
pub fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Resolve `path` against `root`.
pub fn get<'a>(path: &str, root: &'a Value) -> Result<&'a Value, PathError> {
    let segments = segments(path)?;
    let mut current = root;

    for (n, segment) in segments.iter().enumerate() {
        if !is_nested(current) {
            return Err(PathError::NotAnObject {
                parent: parent(&segments, n),
                segment: (*segment).to_owned(),
            });
        }
        current = child(current, segment)
            .ok_or_else(|| PathError::Missing(parent(&segments, n + 1)))?;
    }

    Ok(current)
}

/// Resolve all but the last segment of `path`, then return the slot the last
/// segment names. A missing object key is inserted as `null`, array indices
/// must already exist.
pub fn slot_mut<'a>(path: &str, root: &'a mut Value) -> Result<&'a mut Value, PathError> {
    let segments = segments(path)?;
    let (last, init) = match segments.split_last() {
        Some(split) => split,
        None => return Err(PathError::Empty(path.to_owned())),
    };

    let mut current = root;

    for (n, segment) in init.iter().enumerate() {
        if !is_nested(current) {
            return Err(PathError::NotAnObject {
                parent: parent(&segments, n),
                segment: (*segment).to_owned(),
            });
        }
        current = child_mut(current, segment)
            .ok_or_else(|| PathError::Missing(parent(&segments, n + 1)))?;
    }

    match current {
        Value::Object(map) => Ok(map.entry(*last).or_insert(Value::Null)),
        Value::Array(items) => last
            .parse::<usize>()
            .ok()
            .and_then(move |i| items.get_mut(i))
            .ok_or_else(|| PathError::Missing(path.to_owned())),
        _ => Err(PathError::NotAnObject {
            parent: parent(&segments, init.len()),
            segment: (*last).to_owned(),
        }),
    }
}

/// Assign `value` at `path`, returning the value it replaced.
pub fn set(path: &str, root: &mut Value, value: Value) -> Result<Value, PathError> {
    let slot = slot_mut(path, root)?;

    Ok(std::mem::replace(slot, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_nested() {
        let state = json!({ "nested": { "another": { "deep": "privet" } }, "list": [1, 2, 3] });

        assert_eq!(get("nested.another.deep", &state), Ok(&json!("privet")));
        assert_eq!(get("list.1", &state), Ok(&json!(2)));
    }

    #[test]
    fn get_through_primitive() {
        let state = json!({ "name": "Armen" });

        assert_eq!(
            get("name.first", &state),
            Err(PathError::NotAnObject {
                parent: "name".into(),
                segment: "first".into(),
            })
        );
    }

    #[test]
    fn get_missing() {
        let state = json!({ "user": {} });

        assert_eq!(get("user.name", &state), Err(PathError::Missing("user.name".into())));
        assert_eq!(get("profile.name", &state), Err(PathError::Missing("profile".into())));
    }

    #[test]
    fn empty_segments() {
        let state = json!({});

        assert_eq!(get("", &state), Err(PathError::Empty("".into())));
        assert_eq!(get("a..b", &state), Err(PathError::Empty("a..b".into())));
    }

    #[test]
    fn set_inserts_missing_key() {
        let mut state = json!({ "user": {} });

        assert_eq!(set("user.name", &mut state, json!("Armen")), Ok(Value::Null));
        assert_eq!(state, json!({ "user": { "name": "Armen" } }));
    }

    #[test]
    fn set_requires_parent() {
        let mut state = json!({ "count": 1 });

        assert_eq!(
            set("user.name", &mut state, json!("Armen")),
            Err(PathError::Missing("user".into()))
        );
        assert_eq!(
            set("count.value", &mut state, json!(2)),
            Err(PathError::NotAnObject {
                parent: "count".into(),
                segment: "value".into(),
            })
        );
    }

    #[test]
    fn set_array_index() {
        let mut state = json!({ "items": [1, 2] });

        assert_eq!(set("items.0", &mut state, json!(10)), Ok(json!(1)));
        assert_eq!(set("items.2", &mut state, json!(3)), Err(PathError::Missing("items.2".into())));
        assert_eq!(state, json!({ "items": [10, 2] }));
    }

    #[test]
    fn joining() {
        assert_eq!(join("", "name"), "name");
        assert_eq!(join("user", ""), "user");
        assert_eq!(join("user.profile", "name"), "user.profile.name");
    }
}
