/*!
 * Structure-preserving traversal of JSON-like values.
 *
 * Collection walks a `TreeValue` depth-first and records every translatable
 * string with its `Path`. Reconstruction deep-copies the original value and
 * writes translated strings back at those paths, so the output has exactly
 * the shape of the input.
 */

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::StructureError;

use super::annotator::has_alphanumeric;

/// An arbitrary JSON-like value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<TreeValue>),
    Mapping(BTreeMap<String, TreeValue>),
}

impl TreeValue {
    /// Borrow the string if this is a string leaf
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TreeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a mapping from key/value pairs
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TreeValue)>,
    {
        TreeValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Follow a path to a value
    pub fn get_path(&self, path: &Path) -> Option<&TreeValue> {
        path.tokens().iter().try_fold(self, |node, token| match (node, token) {
            (TreeValue::Mapping(map), PathToken::Key(key)) => map.get(key),
            (TreeValue::Sequence(items), PathToken::Index(index)) => items.get(*index),
            _ => None,
        })
    }
}

impl From<&str> for TreeValue {
    fn from(value: &str) -> Self {
        TreeValue::String(value.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(value: String) -> Self {
        TreeValue::String(value)
    }
}

impl From<Value> for TreeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TreeValue::Null,
            Value::Bool(b) => TreeValue::Bool(b),
            Value::Number(n) => TreeValue::Number(n),
            Value::String(s) => TreeValue::String(s),
            Value::Array(items) => TreeValue::Sequence(items.into_iter().map(TreeValue::from).collect()),
            Value::Object(map) => {
                TreeValue::Mapping(map.into_iter().map(|(k, v)| (k, TreeValue::from(v))).collect())
            }
        }
    }
}

impl From<TreeValue> for Value {
    fn from(value: TreeValue) -> Self {
        match value {
            TreeValue::Null => Value::Null,
            TreeValue::Bool(b) => Value::Bool(b),
            TreeValue::Number(n) => Value::Number(n),
            TreeValue::String(s) => Value::String(s),
            TreeValue::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            TreeValue::Mapping(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Map<_, _>>())
            }
        }
    }
}

/// One step of a path: a mapping key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    Key(String),
    Index(usize),
}

impl PathToken {
    /// Whether this token names an excluded key
    fn is_excluded(&self, exclude_keys: &HashSet<String>) -> bool {
        match self {
            PathToken::Key(key) => exclude_keys.contains(key),
            PathToken::Index(index) => exclude_keys.contains(&index.to_string()),
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Key(key) => write!(f, ".{}", key),
            PathToken::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Address of a value inside a tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathToken>);

impl Path {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.0
    }

    /// Append a key token
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathToken::Key(key.into()));
        self
    }

    /// Append an index token
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathToken::Index(index));
        self
    }
}

impl From<Vec<PathToken>> for Path {
    fn from(tokens: Vec<PathToken>) -> Self {
        Self(tokens)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for token in &self.0 {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// Collect every translatable string leaf with its path.
///
/// Subtrees under an excluded key (at any depth above the leaf) are skipped.
/// Strings without alphanumeric characters and all non-string scalars are
/// left out. Mappings are visited in key order, so the output order is
/// deterministic.
pub fn collect(data: &TreeValue, exclude_keys: &HashSet<String>) -> Vec<(Path, String)> {
    let mut collected = Vec::new();
    let mut current = Vec::new();
    visit(data, exclude_keys, &mut current, &mut collected);
    collected
}

fn visit(
    node: &TreeValue,
    exclude_keys: &HashSet<String>,
    current: &mut Vec<PathToken>,
    collected: &mut Vec<(Path, String)>,
) {
    match node {
        TreeValue::String(text) => {
            if has_alphanumeric(text) {
                collected.push((Path(current.clone()), text.clone()));
            }
        }
        TreeValue::Mapping(map) => {
            for (key, value) in map {
                descend(PathToken::Key(key.clone()), value, exclude_keys, current, collected);
            }
        }
        TreeValue::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                descend(PathToken::Index(index), item, exclude_keys, current, collected);
            }
        }
        TreeValue::Null | TreeValue::Bool(_) | TreeValue::Number(_) => {}
    }
}

fn descend(
    token: PathToken,
    child: &TreeValue,
    exclude_keys: &HashSet<String>,
    current: &mut Vec<PathToken>,
    collected: &mut Vec<(Path, String)>,
) {
    // Ancestors were checked on the way down
    if token.is_excluded(exclude_keys) {
        return;
    }
    current.push(token);
    visit(child, exclude_keys, current, collected);
    current.pop();
}

/// Rebuild `original` with `translated[i]` written at `paths[i]`.
///
/// The result is a deep copy; the original is never modified. Every path
/// must address an existing string leaf.
pub fn reconstruct(
    original: &TreeValue,
    paths: &[Path],
    translated: &[String],
) -> Result<TreeValue, StructureError> {
    if paths.len() != translated.len() {
        return Err(StructureError::CountMismatch {
            paths: paths.len(),
            translations: translated.len(),
        });
    }

    let mut result = original.clone();
    for (path, text) in paths.iter().zip(translated) {
        let leaf = leaf_mut(&mut result, path)?;
        *leaf = text.clone();
    }
    Ok(result)
}

fn leaf_mut<'a>(root: &'a mut TreeValue, path: &Path) -> Result<&'a mut String, StructureError> {
    let not_found = || StructureError::PathNotFound { path: path.to_string() };

    let mut node = root;
    for token in path.tokens() {
        node = match (node, token) {
            (TreeValue::Mapping(map), PathToken::Key(key)) => map.get_mut(key).ok_or_else(not_found)?,
            (TreeValue::Sequence(items), PathToken::Index(index)) => {
                items.get_mut(*index).ok_or_else(not_found)?
            }
            _ => return Err(not_found()),
        };
    }

    match node {
        TreeValue::String(text) => Ok(text),
        _ => Err(StructureError::NotAString { path: path.to_string() }),
    }
}
