//! Shallow merge of fragments that target the same property.

use crate::types::Fragment;

/// Overlay `next` onto `base`. Same-named keys in `next` replace the
/// value in `base` wholesale; nested objects are not merged.
pub fn overlay(base: &mut Fragment, next: Fragment) {
    for (key, value) in next {
        base.insert(key, value);
    }
}

/// Merge fragments left to right.
pub fn merge_fragments<I>(fragments: I) -> Fragment
where
    I: IntoIterator<Item = Fragment>,
{
    let mut merged = Fragment::new();
    for fragment in fragments {
        overlay(&mut merged, fragment);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::fragment;
    use serde_json::{json, Value};

    #[test]
    fn later_keys_win() {
        let merged = merge_fragments([
            fragment(json!({ "a": 1 })),
            fragment(json!({ "a": 2, "b": 3 })),
        ]);
        assert_eq!(Value::Object(merged), json!({ "a": 2, "b": 3 }));
    }

    #[test]
    fn disjoint_keys_are_kept() {
        let merged = merge_fragments([
            fragment(json!({ "format": "email" })),
            fragment(json!({ "type": "string" })),
        ]);
        assert_eq!(
            Value::Object(merged),
            json!({ "format": "email", "type": "string" })
        );
    }

    #[test]
    fn nested_objects_are_replaced() {
        let merged = merge_fragments([
            fragment(json!({ "items": { "type": "string", "maxLength": 20 } })),
            fragment(json!({ "items": { "minLength": 1 } })),
        ]);
        assert_eq!(
            Value::Object(merged),
            json!({ "items": { "minLength": 1 } })
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(merge_fragments(Vec::new()).is_empty());
    }

    #[test]
    fn overlay_keeps_first_seen_key_order() {
        let mut base = fragment(json!({ "type": "string", "format": "email" }));
        overlay(&mut base, fragment(json!({ "type": "number" })));
        let keys: Vec<&str> = base.keys().map(String::as_str).collect();
        assert_eq!(keys, ["type", "format"]);
    }
}
