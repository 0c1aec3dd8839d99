//! Translation tree model
//!
//! A translation file is a nested mapping whose leaves are strings. Arrays,
//! numbers, booleans and null are rejected when a tree is built from raw JSON.

pub mod diff;
pub mod merge;
pub mod prune;

use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use serde_json::Value;
use thiserror::Error;

pub use diff::{
    TreeDiff,
    diff,
    find_missing_content,
    find_obsolete_keys,
};
pub use merge::deep_merge;
pub use prune::remove_keys;

/// Errors raised when raw JSON does not have the shape of a translation tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Translation tree must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Malformed translation tree at '{path}': expected a string or an object, found {found}")]
    Malformed { path: String, found: &'static str },
}

/// A single value in a translation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationNode {
    /// Translated text.
    Leaf(String),
    /// Nested namespace.
    Tree(TranslationTree),
}

impl TranslationNode {
    #[must_use]
    pub const fn as_tree(&self) -> Option<&TranslationTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(text) => Some(text),
            Self::Tree(_) => None,
        }
    }
}

impl From<&str> for TranslationNode {
    fn from(text: &str) -> Self {
        Self::Leaf(text.to_string())
    }
}

impl From<String> for TranslationNode {
    fn from(text: String) -> Self {
        Self::Leaf(text)
    }
}

impl From<TranslationTree> for TranslationNode {
    fn from(tree: TranslationTree) -> Self {
        Self::Tree(tree)
    }
}

/// Ordered mapping of keys to translation nodes.
///
/// Key order follows the source document so rewritten files keep the
/// author's layout. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranslationTree {
    entries: IndexMap<String, TranslationNode>,
}

impl TranslationTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from parsed JSON, validating every node.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use json_i18n_sync::tree::TranslationTree;
    ///
    /// let tree = TranslationTree::from_value(json!({ "common": { "hello": "Hello" } })).unwrap();
    /// assert_eq!(tree.leaf_count(), 1);
    ///
    /// assert!(TranslationTree::from_value(json!({ "count": 3 })).is_err());
    /// ```
    pub fn from_value(value: Value) -> Result<Self, TreeError> {
        match value {
            Value::Object(map) => Self::from_object(map, &KeyPath::root()),
            other => Err(TreeError::NotAnObject { found: json_kind(&other) }),
        }
    }

    fn from_object(map: serde_json::Map<String, Value>, at: &KeyPath) -> Result<Self, TreeError> {
        let mut entries = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let path = at.child(&key);
            let node = match value {
                Value::String(text) => TranslationNode::Leaf(text),
                Value::Object(child) => TranslationNode::Tree(Self::from_object(child, &path)?),
                other => {
                    return Err(TreeError::Malformed {
                        path: path.to_string(),
                        found: json_kind(&other),
                    });
                }
            };
            entries.insert(key, node);
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TranslationNode> {
        self.entries.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value. Replacing keeps the key's position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<TranslationNode>) {
        self.entries.insert(key.into(), node.into());
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<TranslationNode> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TranslationNode)> {
        self.entries.iter()
    }

    /// Resolve a key path to a node.
    #[must_use]
    pub fn node_at(&self, path: &KeyPath) -> Option<&TranslationNode> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get(segment)?.as_tree()?;
        }
        current.get(last)
    }

    /// Number of leaf translations at any depth.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                TranslationNode::Leaf(_) => 1,
                TranslationNode::Tree(tree) => tree.leaf_count(),
            })
            .sum()
    }
}

impl<'de> Deserialize<'de> for TranslationTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl<K, N> FromIterator<(K, N)> for TranslationTree
where
    K: Into<String>,
    N: Into<TranslationNode>,
{
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, n)| (k.into(), n.into())).collect() }
    }
}

impl<'a> IntoIterator for &'a TranslationTree {
    type Item = (&'a String, &'a TranslationNode);
    type IntoIter = indexmap::map::Iter<'a, String, TranslationNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Address of one node in a translation tree, root to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path.
    #[must_use]
    pub const fn root() -> Self {
        Self { segments: Vec::new() }
    }

    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// Split an external key (`common.hello`) on `separator`.
    #[must_use]
    pub fn parse(key: &str, separator: &str) -> Self {
        if key.is_empty() {
            return Self::root();
        }
        Self::new(key.split(separator))
    }

    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self::parse(key, ".")
    }
}

/// Look up the leaf at `path`, or `default` if it is missing or names a subtree.
#[must_use]
pub fn get_by_path(tree: &TranslationTree, path: &KeyPath, default: &str) -> String {
    tree.node_at(path).and_then(TranslationNode::as_leaf).unwrap_or(default).to_string()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build a tree from a `serde_json::json!` literal in tests.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn tree(value: Value) -> TranslationTree {
    TranslationTree::from_value(value).expect("test tree literal must be valid")
}
