//! Removal of bookkeeping fields from JSON values.

use serde_json::{Map, Value};

/// Fields used while building the tree that never reach the output.
pub const BOOKKEEPING_KEYS: [&str; 3] = ["tag", "markup", "parent"];

pub fn is_bookkeeping(key: &str) -> bool {
    BOOKKEEPING_KEYS.contains(&key)
}

/// Visit every object nested in `value` (arrays included), children first.
pub fn visit_objects_mut<F>(value: &mut Value, visit: &mut F)
where
    F: FnMut(&mut Map<String, Value>),
{
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                visit_objects_mut(child, visit);
            }
            visit(map);
        }
        Value::Array(items) => {
            for item in items {
                visit_objects_mut(item, visit);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Remove bookkeeping fields at every depth. Idempotent.
pub fn strip_bookkeeping(value: &mut Value) {
    visit_objects_mut(value, &mut strip_object);
}

/// Remove bookkeeping fields from `map` itself, leaving nested values alone.
pub fn strip_object(map: &mut Map<String, Value>) {
    map.retain(|key, _| !is_bookkeeping(key));
}

/// Copy of `value` without its own bookkeeping fields (non-recursive).
pub fn stripped_shallow(value: &Value) -> Value {
    let mut copy = value.clone();
    if let Value::Object(map) = &mut copy {
        strip_object(map);
    }
    copy
}
