//! Key-ordered records that never carry null fields.

use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{AdapterError, Result};

/// Ordered mapping with "sparse dictionary" semantics: a key whose value
/// ends up `null` is removed rather than stored.
///
/// Equality and hashing are defined over the sorted key/value pairs, so two
/// records with the same fields in a different order compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseRecord {
    fields: Map<String, Value>,
}

impl SparseRecord {
    /// Build a record from `(key, default)` pairs in emission order.
    pub fn new<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut record = Self::default();
        record.extend(defaults);
        record
    }

    /// Overlay `overrides` on top of the current fields. Later values win;
    /// a `null` override removes the key.
    pub fn merge<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.extend(overrides);
        self
    }

    /// Store `value` under `key` with every nested `null` removed. A value
    /// that is `null` itself removes the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match strip_nulls(value) {
            Some(value) => {
                self.fields.insert(key, value);
            }
            None => {
                self.fields.shift_remove(&key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fail with a shape error unless `field` holds a mapping.
    pub fn require_mapping(&self, record: &'static str, field: &'static str) -> Result<()> {
        let found = match self.fields.get(field) {
            Some(Value::Object(_)) => return Ok(()),
            Some(other) => json_kind(other),
            None => "nothing",
        };
        Err(AdapterError::Shape {
            record,
            id: self
                .fields
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            field,
            found,
        })
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    fn sorted(&self) -> Vec<(&String, &Value)> {
        let mut pairs: Vec<_> = self.fields.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }
}

impl<K: Into<String>> Extend<(K, Value)> for SparseRecord {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl Hash for SparseRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (key, value) in self.sorted() {
            key.hash(state);
            hash_value(value, state);
        }
    }
}

/// Hash `value` with object keys visited in sorted order, matching the
/// order-insensitive equality of JSON objects.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(val) => {
            1u8.hash(state);
            val.hash(state);
        }
        Value::Number(val) => {
            2u8.hash(state);
            val.to_string().hash(state);
        }
        Value::String(val) => {
            3u8.hash(state);
            val.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            for (key, item) in pairs {
                key.hash(state);
                hash_value(item, state);
            }
        }
    }
}

/// Drop `null` object entries and array items at every depth; `None` when
/// `value` is `null` itself.
fn strip_nulls(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(items.into_iter().filter_map(strip_nulls).collect())),
        Value::Object(map) => Some(Value::Object(
            map.into_iter()
                .filter_map(|(key, item)| strip_nulls(item).map(|item| (key, item)))
                .collect(),
        )),
        other => Some(other),
    }
}

impl Serialize for SparseRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl From<SparseRecord> for Value {
    fn from(record: SparseRecord) -> Self {
        record.into_value()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
