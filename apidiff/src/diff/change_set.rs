use indexmap::{map::Iter, IndexMap};
use serde::Serialize;
use serde_json::Value;

/// One divergence between the two trees at a single path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Change {
    /// Present in "from", absent in "to".
    Removed { from: Value },
    /// Present in "to", absent in "from".
    Added { to: Value },
    Modified { from: Value, to: Value },
}

/// Path-keyed differences in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: IndexMap<String, Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, path: String, change: Change) {
        self.changes.insert(path, change);
    }

    pub fn get(&self, path: &str) -> Option<&Change> {
        self.changes.get(path)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, Change> {
        self.changes.iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a String, &'a Change);
    type IntoIter = Iter<'a, String, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
