// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed extraction of method-call arguments.
//
// Missing or null keys always take the caller-supplied default. What happens
// to a present value of the wrong type depends on the `ArgumentPolicy`.

use lightalarm_core::config::ArgumentPolicy;
use lightalarm_core::error::{AlarmBridgeError, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Read-only view over the `args` of a method call.
pub struct Arguments<'a> {
    map: Option<&'a Map<String, Value>>,
    policy: ArgumentPolicy,
}

impl<'a> Arguments<'a> {
    /// Wrap a call's arguments. Anything other than an object or null is
    /// ignored under the lenient policy and rejected under the strict one.
    pub fn new(args: &'a Value, policy: ArgumentPolicy) -> Result<Self> {
        let map = match args {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => match policy {
                ArgumentPolicy::Lenient => {
                    debug!(kind = kind_of(other), "ignoring non-map arguments");
                    None
                }
                ArgumentPolicy::Strict => {
                    return Err(AlarmBridgeError::invalid_argument(
                        "arguments",
                        format!("expected a map, got {}", kind_of(other)),
                    ));
                }
            },
        };
        Ok(Self { map, policy })
    }

    pub fn string(&self, field: &str, default: &str) -> Result<String> {
        self.extract(field, default.to_owned(), "string", |v| {
            v.as_str().map(str::to_owned)
        })
    }

    pub fn bool(&self, field: &str, default: bool) -> Result<bool> {
        self.extract(field, default, "bool", Value::as_bool)
    }

    /// 32-bit integer; values outside `i32` count as wrong-typed.
    pub fn int(&self, field: &str, default: i32) -> Result<i32> {
        self.extract(field, default, "32-bit integer", |v| {
            v.as_i64().and_then(|n| i32::try_from(n).ok())
        })
    }

    fn extract<T>(
        &self,
        field: &str,
        default: T,
        expected: &str,
        read: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T> {
        let value = match self.map.and_then(|m| m.get(field)) {
            None | Some(Value::Null) => return Ok(default),
            Some(value) => value,
        };
        if let Some(parsed) = read(value) {
            return Ok(parsed);
        }
        match self.policy {
            ArgumentPolicy::Lenient => {
                debug!(field, expected, got = kind_of(value), "argument replaced by default");
                Ok(default)
            }
            ArgumentPolicy::Strict => Err(AlarmBridgeError::invalid_argument(
                field,
                format!("expected {expected}, got {}", kind_of(value)),
            )),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_take_defaults() {
        let args = json!({ "title": null });
        for policy in [ArgumentPolicy::Lenient, ArgumentPolicy::Strict] {
            let a = Arguments::new(&args, policy).unwrap();
            assert_eq!(a.string("title", "t").unwrap(), "t");
            assert!(a.bool("ongoing", true).unwrap());
            assert_eq!(a.int("alarmId", 3).unwrap(), 3);
        }
    }

    #[test]
    fn lenient_masks_wrong_types() {
        let args = json!({ "title": 5, "autoCancel": "yes", "alarmId": 1.5 });
        let a = Arguments::new(&args, ArgumentPolicy::Lenient).unwrap();
        assert_eq!(a.string("title", "default").unwrap(), "default");
        assert!(a.bool("autoCancel", true).unwrap());
        assert_eq!(a.int("alarmId", 0).unwrap(), 0);
    }

    #[test]
    fn strict_rejects_wrong_types() {
        let args = json!({ "autoCancel": "yes" });
        let a = Arguments::new(&args, ArgumentPolicy::Strict).unwrap();
        match a.bool("autoCancel", true).unwrap_err() {
            AlarmBridgeError::InvalidArgument { field, reason } => {
                assert_eq!(field, "autoCancel");
                assert_eq!(reason, "expected bool, got string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_rejects_out_of_range_int() {
        let args = json!({ "alarmId": 1_u64 << 40 });
        let a = Arguments::new(&args, ArgumentPolicy::Strict).unwrap();
        assert!(a.int("alarmId", 0).is_err());
    }

    #[test]
    fn non_map_arguments() {
        let args = json!([1, 2]);
        let a = Arguments::new(&args, ArgumentPolicy::Lenient).unwrap();
        assert_eq!(a.string("label", "x").unwrap(), "x");
        assert!(Arguments::new(&args, ArgumentPolicy::Strict).is_err());
    }

    #[test]
    fn present_values_are_read() {
        let args = json!({ "label": "Wake up", "alarmId": 7, "ongoing": true });
        let a = Arguments::new(&args, ArgumentPolicy::Strict).unwrap();
        assert_eq!(a.string("label", "").unwrap(), "Wake up");
        assert_eq!(a.int("alarmId", 0).unwrap(), 7);
        assert!(a.bool("ongoing", false).unwrap());
    }
}
