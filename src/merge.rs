//! Merge functions for JSON config values.
//!
//! Two flavours with different `null` semantics:
//! - [`deep_merge`] layers settings tiers; `null` in the overlay means "not specified".
//! - [`recursive_update`] is the merge-write used by section stores; `null` deletes the key.
//!
//! In both, objects merge key-by-key and anything else is replaced wholesale.

use serde_json::{Map, Value};

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// # Example
/// ```
/// use serde_json::json;
/// use nb_config_manager::merge::deep_merge;
///
/// let base = json!({"disable_user_config": false, "user_config_dir": "/home/a/.jupyter"});
/// let overlay = json!({"disable_user_config": true, "user_config_dir": null});
/// let result = deep_merge(base, overlay);
/// assert_eq!(result, json!({"disable_user_config": true, "user_config_dir": "/home/a/.jupyter"}));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

/// Recursively update `target` in place with the keys of `update`.
///
/// Nested objects are merged, a `null` value removes the key from `target`,
/// and any other value overwrites.
pub fn recursive_update(target: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, value) in update {
        match value {
            Value::Object(nested) => {
                let slot = target
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(slot_map) = slot {
                    recursive_update(slot_map, nested);
                }
            }
            Value::Null => {
                target.remove(&key);
            }
            other => {
                target.insert(key, other);
            }
        }
    }
}

/// Union of two activation maps. Entries in `user` win on key collision;
/// entries only present in `environment` are kept.
pub fn merge_activation_maps(
    environment: &Map<String, Value>,
    user: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = environment.clone();
    for (extension, payload) in user {
        merged.insert(extension.clone(), payload.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_simple_objects() {
        let base = json!({"a": 1, "b": 2});
        let overlay = json!({"b": 3, "c": 4});
        assert_eq!(deep_merge(base, overlay), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_null_preserves_base() {
        let base = json!({"a": 1, "b": {"c": 2}});
        let overlay = json!({"a": null, "b": {"c": null}});
        assert_eq!(deep_merge(base, overlay), json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_merge_all() {
        let values = vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "c": 4})];
        assert_eq!(deep_merge_all(values), json!({"a": 3, "b": 2, "c": 4}));
    }

    #[test]
    fn test_recursive_update_merges_nested() {
        let mut target = obj(json!({
            "load_extensions": {"a": true},
            "Cell": {"cm_config": {"lineNumbers": false}}
        }));
        recursive_update(
            &mut target,
            obj(json!({"load_extensions": {"b": true}, "other": 1})),
        );
        assert_eq!(
            Value::Object(target),
            json!({
                "load_extensions": {"a": true, "b": true},
                "Cell": {"cm_config": {"lineNumbers": false}},
                "other": 1
            })
        );
    }

    #[test]
    fn test_recursive_update_null_removes_key() {
        let mut target = obj(json!({"keep": 1, "drop": {"x": 2}}));
        recursive_update(&mut target, obj(json!({"drop": null})));
        assert_eq!(Value::Object(target), json!({"keep": 1}));
    }

    #[test]
    fn test_recursive_update_object_replaces_scalar() {
        let mut target = obj(json!({"load_extensions": false}));
        recursive_update(&mut target, obj(json!({"load_extensions": {"a": true}})));
        assert_eq!(Value::Object(target), json!({"load_extensions": {"a": true}}));
    }

    #[test]
    fn test_activation_union_user_wins() {
        let env = obj(json!({"a": true, "b": false}));
        let user = obj(json!({"b": true, "c": true}));
        let merged = merge_activation_maps(&env, &user);
        assert_eq!(
            Value::Object(merged),
            json!({"a": true, "b": true, "c": true})
        );
    }

    #[test]
    fn test_activation_payloads_are_opaque() {
        let env = obj(json!({"a": {"enabled": true}}));
        let user = obj(json!({"b": "yes"}));
        let merged = merge_activation_maps(&env, &user);
        assert_eq!(
            Value::Object(merged),
            json!({"a": {"enabled": true}, "b": "yes"})
        );
    }
}
