//! Structural diff between two JSON trees.
//!
//! [`diff`] walks both trees together and records every divergence under the
//! dot-delimited path where it occurs. Mappings are compared key by key and
//! sequences index by index; there is no alignment of shifted elements. With
//! `sort_arrays`, each pair of sequences is first put into canonical order so
//! that a reordering alone produces no changes.
//!
//! ```
//! use apidiff::diff::{diff, Change};
//! use serde_json::json;
//!
//! let changes = diff(&json!({"a": {"b": 1, "c": 2}}), &json!({"a": {"b": 1, "c": 3}}), false);
//! assert_eq!(
//!     changes.get("a.c"),
//!     Some(&Change::Modified { from: json!(2), to: json!(3) })
//! );
//! ```

mod canonical;
mod change_set;

pub use canonical::{deep_equal, sorted_by_canonical_form};
pub use change_set::{Change, ChangeSet};

use serde_json::Value;
use std::borrow::Cow;

/// Compute the changes that turn `from` into `to`.
///
/// When the roots themselves differ in kind (a scalar on either side, or a
/// mapping against a sequence) there are no keys to walk and the whole
/// divergence is reported under the empty path.
pub fn diff(from: &Value, to: &Value, sort_arrays: bool) -> ChangeSet {
    let mut walker = Walker {
        sort_arrays,
        changes: ChangeSet::new(),
    };

    if same_composite_kind(from, to) {
        walker.walk(from, to, None);
    } else if !deep_equal(from, to) {
        walker.changes.insert(
            String::new(),
            Change::Modified {
                from: from.clone(),
                to: to.clone(),
            },
        );
    }

    walker.changes
}

struct Walker {
    sort_arrays: bool,
    changes: ChangeSet,
}

impl Walker {
    fn walk(&mut self, from: &Value, to: &Value, path: Option<&str>) {
        for (key, value) in entries(from) {
            if child(to, &key).is_none() {
                self.changes.insert(
                    build_path(path, &key),
                    Change::Removed {
                        from: value.clone(),
                    },
                );
            }
        }

        let (from, to) = match (from, to) {
            (Value::Array(from), Value::Array(to)) if self.sort_arrays => (
                Cow::Owned(Value::Array(sorted_by_canonical_form(from))),
                Cow::Owned(Value::Array(sorted_by_canonical_form(to))),
            ),
            _ => (Cow::Borrowed(from), Cow::Borrowed(to)),
        };

        for (key, to_value) in entries(&to) {
            let current_path = build_path(path, &key);

            match child(&from, &key) {
                None => self.changes.insert(
                    current_path,
                    Change::Added {
                        to: to_value.clone(),
                    },
                ),
                Some(from_value) if !deep_equal(from_value, to_value) => {
                    if same_composite_kind(from_value, to_value) {
                        self.walk(from_value, to_value, Some(current_path.as_str()));
                    } else {
                        self.changes.insert(
                            current_path,
                            Change::Modified {
                                from: from_value.clone(),
                                to: to_value.clone(),
                            },
                        );
                    }
                }
                Some(_) => {}
            }
        }
    }
}

fn build_path(path: Option<&str>, key: &str) -> String {
    match path {
        Some(path) => format!("{}.{}", path, key),
        None => key.to_string(),
    }
}

fn same_composite_kind(lhs: &Value, rhs: &Value) -> bool {
    matches!(
        (lhs, rhs),
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_))
    )
}

// scalars have no keys
fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key
            .parse::<usize>()
            .ok()
            .filter(|index| index.to_string() == key)
            .and_then(|index| items.get(index)),
        _ => None,
    }
}
