//! Rewrites the singular `group` field into a deduplicated `groups` list.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::document::{is_truthy, to_text, GROUP, GROUPS};

/// Normalise group membership on a node, in place.
///
/// A non-null `group` is removed and seeds the list; a non-null `groups` is
/// appended after it. The merged list is deduplicated keeping first
/// occurrences and stored under `groups`, or `groups` is set to null when
/// nothing remains. An existing `groups` key keeps its position; otherwise it
/// is appended. `group: null` is left as it is.
pub fn normalize_groups(node: &mut Map<String, Value>) {
    let mut collected = Vec::new();

    if node.get(GROUP).is_some_and(|g| !g.is_null()) {
        match node.shift_remove(GROUP) {
            Some(Value::String(s)) if !s.is_empty() => collected.push(s),
            Some(Value::Array(items)) => extend_with_items(&mut collected, &items),
            _ => {}
        }
    }

    match node.get(GROUPS) {
        Some(Value::String(s)) => collected.push(s.clone()),
        Some(Value::Array(items)) => extend_with_items(&mut collected, items),
        _ => {}
    }

    let deduped = dedup_first_seen(collected);
    let value = if deduped.is_empty() {
        Value::Null
    } else {
        Value::Array(deduped.into_iter().map(Value::String).collect())
    };
    node.insert(GROUPS.to_string(), value);
}

fn extend_with_items(collected: &mut Vec<String>, items: &[Value]) {
    collected.extend(items.iter().filter(|v| is_truthy(v)).map(to_text));
}

fn dedup_first_seen(groups: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    groups.into_iter().filter(|g| seen.insert(g.clone())).collect()
}
