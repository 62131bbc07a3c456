//! Flat HTML form submissions into a typed tree.
//!
//! Browsers post nested form state as flat `key=value` pairs whose keys are
//! dot-separated paths (`Monday.0.start.hour=9`). [`FormTree::from_pairs`]
//! rebuilds the nesting, and the `coerce_*` helpers turn leaf strings into
//! primitives. Every failure carries the dotted path of the offending field so
//! callers can annotate the form.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormErrorReason {
    #[error("is required")]
    Missing,

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("'{0}' is not a boolean")]
    NotABoolean(String),

    #[error("'{0}' is not a list")]
    NotAList(String),

    #[error("is set both as a value and as a group")]
    Conflict,

    #[error("list index {0} is missing")]
    IndexGap(usize),

    #[error("contains an empty path segment")]
    EmptySegment,

    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },

    #[error("'{0}' is not a recognised option")]
    UnknownVariant(String),

    #[error("has more than {max} entries")]
    TooMany { max: usize },

    #[error("repeats '{0}'")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct FormError {
    pub path: String,
    pub reason: FormErrorReason,
}

impl FormError {
    pub fn new(path: impl Into<String>, reason: FormErrorReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// Nested form state. A group whose keys are all `0..n` becomes a [`FormTree::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTree {
    Value(String),
    Map(BTreeMap<String, FormTree>),
    List(Vec<FormTree>),
}

// Intermediate shape while pairs are still arriving.
enum Node {
    Leaf(String),
    Branch(BTreeMap<String, Node>),
}

impl FormTree {
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut root = BTreeMap::new();
        let mut count = 0usize;

        for (key, value) in pairs {
            let key = key.as_ref();
            let segments: Vec<&str> = key.split('.').collect();
            insert(&mut root, &segments, value.into(), key)?;
            count += 1;
        }

        debug!("Decoded {} form fields into {} top-level groups", count, root.len());
        finalize(root, "")
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FormTree::Value(_) => "a value",
            FormTree::Map(_) => "a group",
            FormTree::List(_) => "a list",
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            FormTree::Value(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FormTree> {
        match self {
            FormTree::Map(entries) => entries.get(key),
            FormTree::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            FormTree::Value(_) => None,
        }
    }

    pub fn expect_map(&self, path: &str) -> Result<&BTreeMap<String, FormTree>, FormError> {
        match self {
            FormTree::Map(entries) => Ok(entries),
            other => Err(shape_error(path, "a group", other)),
        }
    }

    pub fn expect_value(&self, path: &str) -> Result<&str, FormError> {
        match self {
            FormTree::Value(raw) => Ok(raw),
            other => Err(shape_error(path, "a value", other)),
        }
    }

    /// Looks up a child that must be present.
    pub fn require(&self, key: &str, path: &str) -> Result<&FormTree, FormError> {
        self.get(key)
            .ok_or_else(|| FormError::new(join_path(path, key), FormErrorReason::Missing))
    }

    /// Required child leaf coerced to an integer within `min..=max`.
    pub fn int_field(&self, key: &str, path: &str, min: i64, max: i64) -> Result<i64, FormError> {
        let field_path = join_path(path, key);
        let raw = self.require(key, path)?.expect_value(&field_path)?;
        coerce_int_in_range(raw, &field_path, min, max)
    }
}

fn shape_error(path: &str, expected: &'static str, found: &FormTree) -> FormError {
    FormError::new(
        path,
        FormErrorReason::UnexpectedShape {
            expected,
            found: found.kind(),
        },
    )
}

fn insert(
    branch: &mut BTreeMap<String, Node>,
    segments: &[&str],
    value: String,
    full_key: &str,
) -> Result<(), FormError> {
    let (head, rest) = match segments.split_first() {
        Some((head, rest)) if !head.is_empty() => (*head, rest),
        _ => return Err(FormError::new(full_key, FormErrorReason::EmptySegment)),
    };

    if rest.is_empty() {
        if let Some(Node::Branch(_)) = branch.get(head) {
            return Err(FormError::new(full_key, FormErrorReason::Conflict));
        }
        // Repeated keys: the last submitted value wins.
        branch.insert(head.to_string(), Node::Leaf(value));
        return Ok(());
    }

    let child = branch
        .entry(head.to_string())
        .or_insert_with(|| Node::Branch(BTreeMap::new()));

    match child {
        Node::Branch(inner) => insert(inner, rest, value, full_key),
        Node::Leaf(_) => Err(FormError::new(full_key, FormErrorReason::Conflict)),
    }
}

fn finalize(branch: BTreeMap<String, Node>, path: &str) -> Result<FormTree, FormError> {
    let indexed: Option<Vec<usize>> = if branch.is_empty() {
        None
    } else {
        branch.keys().map(|k| parse_index(k)).collect()
    };

    if let Some(mut indices) = indexed {
        indices.sort_unstable();
        if let Some(gap) = indices.iter().enumerate().find(|(pos, idx)| pos != *idx) {
            return Err(FormError::new(path, FormErrorReason::IndexGap(gap.0)));
        }

        let mut slots: Vec<(usize, Node)> = branch
            .into_iter()
            .filter_map(|(k, node)| parse_index(&k).map(|i| (i, node)))
            .collect();
        slots.sort_unstable_by_key(|(i, _)| *i);

        let items = slots
            .into_iter()
            .map(|(i, node)| finalize_node(node, &join_path(path, i)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(FormTree::List(items));
    }

    let entries = branch
        .into_iter()
        .map(|(key, node)| {
            let child = finalize_node(node, &join_path(path, &key))?;
            Ok((key, child))
        })
        .collect::<Result<BTreeMap<_, _>, FormError>>()?;

    Ok(FormTree::Map(entries))
}

fn finalize_node(node: Node, path: &str) -> Result<FormTree, FormError> {
    match node {
        Node::Leaf(raw) => Ok(FormTree::Value(raw)),
        Node::Branch(inner) => finalize(inner, path),
    }
}

// Only canonical indices ("0", "12"), so "01" and "+1" stay map keys.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

pub fn join_path(parent: &str, key: impl fmt::Display) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

pub fn coerce_int(raw: &str, path: &str) -> Result<i64, FormError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FormError::new(path, FormErrorReason::NotANumber(raw.to_string())))
}

pub fn coerce_int_in_range(raw: &str, path: &str, min: i64, max: i64) -> Result<i64, FormError> {
    let value = coerce_int(raw, path)?;
    if value < min || value > max {
        return Err(FormError::new(path, FormErrorReason::OutOfRange { min, max }));
    }
    Ok(value)
}

/// Checkbox semantics: an unchecked box posts nothing or an empty string.
pub fn coerce_bool(raw: &str, path: &str) -> Result<bool, FormError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" => Ok(true),
        "false" | "off" | "" => Ok(false),
        _ => Err(FormError::new(path, FormErrorReason::NotABoolean(raw.to_string()))),
    }
}

/// Parses a bracket-prefixed value (`["a", 2]`) as a list of strings.
pub fn coerce_list(raw: &str, path: &str) -> Result<Vec<String>, FormError> {
    let not_a_list = || FormError::new(path, FormErrorReason::NotAList(raw.to_string()));

    if !raw.trim_start().starts_with('[') {
        return Err(not_a_list());
    }

    let parsed: serde_json::Value = serde_json::from_str(raw).map_err(|_| not_a_list())?;
    let items = parsed.as_array().ok_or_else(not_a_list)?;

    items
        .iter()
        .map(|item| match item {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            _ => Err(not_a_list()),
        })
        .collect()
}
