//! Untyped records: a row as an ordered attribute map.

use crate::error::{OrmError, OrmResult};
use crate::map::OrderedMap;
use crate::row::FromRow;
use crate::value::Value;
use serde::ser::{Serialize, Serializer};
use tokio_postgres::Row;

/// Primary-key column assumed when none is configured.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A row's columns by name, in column order, plus the primary-key column name.
///
/// ```ignore
/// let mut user = Record::new();
/// user.set("name", "alice").add_data([("status", Value::from(1))]);
/// user.set_id(42);
/// assert_eq!(user.id(), Some(&Value::Int(42)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    primary_key: String,
    data: OrderedMap<Value>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            data: OrderedMap::new(),
        }
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `column` as the primary key for [`Record::id`] / [`Record::set_id`].
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// All attributes.
    pub fn data(&self) -> &OrderedMap<Value> {
        &self.data
    }

    pub fn into_data(self) -> OrderedMap<Value> {
        self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Look up `key`, falling back to a dotted path into JSON attributes.
    ///
    /// `"meta.tags.0"` reads attribute `meta`, then object key `tags`, then
    /// array index `0`. An attribute literally named `"meta.tags.0"` wins.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        if let Some(v) = self.data.get(path) {
            return Some(v.clone());
        }

        let mut segments = path.split('.');
        let head = self.data.get(segments.next()?)?;
        let mut current = match head {
            Value::Json(json) => json,
            _ => return None,
        };
        for segment in segments {
            current = match current {
                serde_json::Value::Object(obj) => obj.get(segment)?,
                serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(Value::from_json(current.clone()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Set one attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key, value.into());
        self
    }

    /// Merge attributes; incoming values replace existing ones.
    pub fn add_data<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.data
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replace all attributes.
    pub fn replace_data(&mut self, data: OrderedMap<Value>) -> &mut Self {
        self.data = data;
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// The primary-key value, if set.
    pub fn id(&self) -> Option<&Value> {
        self.data.get(&self.primary_key)
    }

    pub fn set_id(&mut self, id: impl Into<Value>) -> &mut Self {
        let key = self.primary_key.clone();
        self.set(key, id)
    }
}

impl FromRow for Record {
    fn from_row(row: &Row) -> OrmResult<Self> {
        let mut data = OrderedMap::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let value: Value = row
                .try_get(idx)
                .map_err(|e| OrmError::decode(column.name(), e.to_string()))?;
            data.insert(column.name(), value);
        }
        Ok(Self {
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            data,
        })
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get() {
        let mut r = Record::new();
        r.set("name", "alice").set("age", 30);
        assert_eq!(r.get("name"), Some(&Value::Text("alice".into())));
        assert_eq!(r.get("age").and_then(Value::as_i64), Some(30));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn add_data_merges_and_later_wins() {
        let mut r = Record::new();
        r.set("a", 1).set("b", 2);
        r.add_data([("b", 20), ("c", 30)]);
        assert_eq!(r.data().keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(r.get("b"), Some(&Value::Int(20)));
    }

    #[test]
    fn replace_data_discards_previous_attributes() {
        let mut r = Record::new();
        r.set("a", 1);
        r.replace_data([("z", Value::Bool(true))].into_iter().collect());
        assert!(!r.contains("a"));
        assert_eq!(r.get("z"), Some(&Value::Bool(true)));
    }

    #[test]
    fn id_uses_the_configured_primary_key() {
        let mut r = Record::new().with_primary_key("user_id");
        assert_eq!(r.id(), None);
        r.set_id(7);
        assert_eq!(r.get("user_id"), Some(&Value::Int(7)));
        assert_eq!(r.id(), Some(&Value::Int(7)));
        assert!(!r.contains("id"));
    }

    #[test]
    fn get_path_walks_json_attributes() {
        let mut r = Record::new();
        r.set("meta", json!({ "tags": ["x", "y"], "color": "red" }));
        r.set("a.b", "literal");

        assert_eq!(r.get_path("meta.color"), Some(Value::Text("red".into())));
        assert_eq!(r.get_path("meta.tags.1"), Some(Value::Text("y".into())));
        assert_eq!(r.get_path("meta.tags.9"), None);
        assert_eq!(r.get_path("a.b"), Some(Value::Text("literal".into())));
        assert_eq!(r.get_path("missing.key"), None);
    }

    #[test]
    fn serializes_as_an_object() {
        let mut r = Record::new();
        r.set("id", 1).set("name", "bob").set("deleted_at", None::<String>);
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "id": 1, "name": "bob", "deleted_at": null })
        );
    }
}
