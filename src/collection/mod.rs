//! Functional helpers over a sequence or a key-ordered mapping of JSON values.
//!
//! A [`Collection`] carries its shape in its variant. Shape-preserving
//! operations (`filt`, `where_`, `rej`) return the same variant; `map` and the
//! slicing helpers always return a sequence. Slicing helpers reject mappings.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{QueryError, Result};

mod value;

pub use value::is_truthy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Seq,
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Seq => f.write_str("sequence"),
            Shape::Map => f.write_str("mapping"),
        }
    }
}

/// Position of a value handed to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Seq(Vec<Value>),
    Map(Map<String, Value>),
}

impl Collection {
    /// Wraps an array or object; any other value has no shape and is rejected.
    pub fn new(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Collection::Seq(items)),
            Value::Object(map) => Ok(Collection::Map(map)),
            other => Err(QueryError::NotAContainer(value::kind_of(&other))),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Collection::Seq(_) => Shape::Seq,
            Collection::Map(_) => Shape::Map,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Seq(items) => items.len(),
            Collection::Map(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&Value, Key<'_>)> + '_> {
        match self {
            Collection::Seq(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (item, Key::Index(index))),
            ),
            Collection::Map(map) => {
                Box::new(map.iter().map(|(key, item)| (item, Key::Name(key.as_str()))))
            }
        }
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Collection::Seq(items) => Box::new(items.iter()),
            Collection::Map(map) => Box::new(map.values()),
        }
    }

    fn items(&self, op: &'static str) -> Result<&[Value]> {
        match self {
            Collection::Seq(items) => Ok(items),
            Collection::Map(_) => Err(QueryError::ShapeMismatch {
                op,
                shape: Shape::Map,
            }),
        }
    }

    pub fn each(&self, mut f: impl FnMut(&Value, Key<'_>)) -> &Self {
        for (item, key) in self.entries() {
            f(item, key);
        }
        self
    }

    /// Transforms every value into a sequence; mapping keys are dropped.
    pub fn map(&self, mut f: impl FnMut(&Value, Key<'_>) -> Value) -> Collection {
        Collection::Seq(self.entries().map(|(item, key)| f(item, key)).collect())
    }

    pub fn find(&self, mut predicate: impl FnMut(&Value, Key<'_>) -> bool) -> Option<&Value> {
        self.entries()
            .find(|(item, key)| predicate(item, *key))
            .map(|(item, _)| item)
    }

    /// First value whose properties equal every entry of `props`.
    pub fn find_w(&self, props: &Value) -> Option<&Value> {
        self.find(|item, _| value::matches_properties(item, props))
    }

    pub fn filt(&self, mut predicate: impl FnMut(&Value, Key<'_>) -> bool) -> Collection {
        match self {
            Collection::Seq(items) => Collection::Seq(
                items
                    .iter()
                    .enumerate()
                    .filter(|(index, item)| predicate(item, Key::Index(*index)))
                    .map(|(_, item)| item.clone())
                    .collect(),
            ),
            Collection::Map(map) => Collection::Map(
                map.iter()
                    .filter(|(key, item)| predicate(item, Key::Name(key.as_str())))
                    .map(|(key, item)| (key.clone(), item.clone()))
                    .collect(),
            ),
        }
    }

    /// `filt` by property equality.
    pub fn where_(&self, props: &Value) -> Collection {
        self.filt(|item, _| value::matches_properties(item, props))
    }

    /// Complement of `filt`; the predicate sees only the value.
    pub fn rej(&self, mut predicate: impl FnMut(&Value) -> bool) -> Collection {
        self.filt(|item, _| !predicate(item))
    }

    pub fn evry(&self, predicate: impl FnMut(&Value) -> bool) -> bool {
        self.values().all(predicate)
    }

    pub fn some(&self, predicate: impl FnMut(&Value) -> bool) -> bool {
        self.values().any(predicate)
    }

    pub fn cont(&self, needle: &Value) -> bool {
        self.values().any(|item| value::same_value(item, needle))
    }

    /// Property `key` of every value; missing properties become `null`.
    pub fn pluk(&self, key: &str) -> Result<Collection> {
        let items = self.items("pluk")?;
        Ok(Collection::Seq(
            items
                .iter()
                .map(|item| value::property(item, key).cloned().unwrap_or(Value::Null))
                .collect(),
        ))
    }

    pub fn frst(&self) -> Result<Option<&Value>> {
        Ok(self.items("frst")?.first())
    }

    pub fn frst_n(&self, n: usize) -> Result<Collection> {
        let items = self.items("frst")?;
        Ok(Collection::Seq(items[..n.min(items.len())].to_vec()))
    }

    pub fn last(&self) -> Result<Option<&Value>> {
        Ok(self.items("last")?.last())
    }

    pub fn last_n(&self, n: usize) -> Result<Collection> {
        let items = self.items("last")?;
        let start = items.len().saturating_sub(n);
        Ok(Collection::Seq(items[start..].to_vec()))
    }

    /// Drops the last `n` values.
    pub fn init(&self, n: usize) -> Result<Collection> {
        let items = self.items("init")?;
        let end = items.len().saturating_sub(n);
        Ok(Collection::Seq(items[..end].to_vec()))
    }

    /// Drops the first `n` values.
    pub fn rest(&self, n: usize) -> Result<Collection> {
        let items = self.items("rest")?;
        Ok(Collection::Seq(items[n.min(items.len())..].to_vec()))
    }

    /// Drops falsy values.
    pub fn comp(&self) -> Result<Collection> {
        let items = self.items("comp")?;
        Ok(Collection::Seq(
            items.iter().filter(|item| is_truthy(item)).cloned().collect(),
        ))
    }

    /// Flattens nested sequences `depth` levels deep.
    pub fn flat(&self, depth: usize) -> Result<Collection> {
        let items = self.items("flat")?;
        let mut out = Vec::with_capacity(items.len());
        value::flatten_into(items, depth, &mut out);
        Ok(Collection::Seq(out))
    }

    pub fn flat_all(&self) -> Result<Collection> {
        self.flat(usize::MAX)
    }

    pub fn val(&self) -> Value {
        self.clone().into_value()
    }

    pub fn into_value(self) -> Value {
        match self {
            Collection::Seq(items) => Value::Array(items),
            Collection::Map(map) => Value::Object(map),
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self> {
        Collection::new(value)
    }
}

impl From<Vec<Value>> for Collection {
    fn from(items: Vec<Value>) -> Self {
        Collection::Seq(items)
    }
}

impl From<Map<String, Value>> for Collection {
    fn from(map: Map<String, Value>) -> Self {
        Collection::Map(map)
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        collection.into_value()
    }
}
