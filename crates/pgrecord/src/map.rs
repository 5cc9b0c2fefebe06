//! Insertion-ordered, string-keyed map.
//!
//! Condition maps, bind maps and record attributes all need the same thing:
//! keys iterate in the order they were first inserted, and assigning an
//! existing key replaces its value without moving it.

use crate::value::BindValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An insertion-ordered map from names to values.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

/// Placeholder name → bound value.
pub type BindMap = OrderedMap<BindValue>;

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Insert a value, returning the previous one if `key` was present.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The first entry, if any.
    pub fn first(&self) -> Option<(&str, &V)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    /// Chainable insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<V>) -> Self {
        self.insert(key, value.into());
        self
    }
}

impl<V, K: Into<String>> Extend<(K, V)> for OrderedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V, K: Into<String>> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build a [`BindMap`] from `key => value` pairs.
///
/// ```ignore
/// let bind = pgrecord::binds! { "status" => 1, "ids" => vec![5, 6, 7] };
/// ```
#[macro_export]
macro_rules! binds {
    () => {
        $crate::BindMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::BindMap::new();
        $(
            map.insert($key, $crate::BindValue::from($value));
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::OrderedMap;

    #[test]
    fn reinserting_keeps_position() {
        let mut m: OrderedMap<i32> = OrderedMap::new();
        m.insert("b", 1);
        m.insert("a", 2);
        assert_eq!(m.insert("b", 3), Some(1));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(m.get("b"), Some(&3));
    }

    #[test]
    fn remove_preserves_order() {
        let mut m: OrderedMap<i32> = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        assert_eq!(m.remove("y"), Some(2));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["x", "z"]);
        assert_eq!(m.remove("missing"), None);
    }

    #[test]
    fn serializes_in_insertion_order() {
        let m: OrderedMap<i32> = [("z", 1), ("a", 2)].into_iter().collect();
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn binds_macro_builds_scalars_and_lists() {
        let bind = crate::binds! { "status" => 1, "ids" => vec![5, 6] };
        assert_eq!(bind.len(), 2);
        assert!(bind.get("ids").unwrap().is_list());
        assert!(!bind.get("status").unwrap().is_list());
    }
}
