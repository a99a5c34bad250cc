//! Lookups into loosely structured JSON records, such as the feature
//! attributes a data store hands to the grid and the info panels.

use serde_json::Value;

/// Follows a dotted path (`"address.city"`, `"layers.0.name"`) through
/// objects and arrays.
///
/// Returns `None` if any step is missing or the value there is `null`.
pub fn get_nested<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for step in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(step)?,
            Value::Array(items) => items.get(step.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// `get_nested`, with `fallback` for anything missing.
pub fn get_nested_or<'a>(value: &'a Value, path: &str, fallback: &'a Value) -> &'a Value {
    get_nested(value, path).unwrap_or(fallback)
}

/// Copies the properties of every source object onto `target`, later
/// sources winning. Non-object sources are ignored; a non-object target is
/// replaced by an empty object first.
pub fn extend(target: &mut Value, sources: &[&Value]) {
    if !target.is_object() {
        *target = Value::Object(Default::default());
    }
    if let Value::Object(merged) = target {
        for source in sources {
            if let Value::Object(props) = source {
                for (key, value) in props {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
