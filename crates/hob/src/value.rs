// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversions of state values for the host.

use std::borrow::Cow;

use serde_json::Value;

/// Text a value turns into when assigned to a string property such as
/// `value` or `innerText`.
pub fn to_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => {
            if let Some(int) = n.as_i64() {
                let mut buf = itoa::Buffer::new();
                Cow::Owned(buf.format(int).to_owned())
            } else if let Some(int) = n.as_u64() {
                let mut buf = itoa::Buffer::new();
                Cow::Owned(buf.format(int).to_owned())
            } else {
                Cow::Owned(n.to_string())
            }
        }
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Truthiness of a value assigned to a boolean property such as `hidden`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(feature = "web")]
pub(crate) fn to_js(value: &Value) -> wasm_bindgen::JsValue {
    use wasm_bindgen::JsValue;

    match value {
        Value::Null => JsValue::NULL,
        Value::Bool(b) => JsValue::from_bool(*b),
        Value::Number(n) => n.as_f64().map_or(JsValue::UNDEFINED, JsValue::from_f64),
        Value::String(s) => JsValue::from_str(s),
        other => js_sys::JSON::parse(&other.to_string()).unwrap_or(JsValue::UNDEFINED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text() {
        assert_eq!(to_text(&json!(null)), "");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&json!(-42)), "-42");
        assert_eq!(to_text(&json!(u64::MAX)), "18446744073709551615");
        assert_eq!(to_text(&json!(1.5)), "1.5");
        assert_eq!(to_text(&json!("Armen")), "Armen");
        assert_eq!(to_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(true)));
    }
}
