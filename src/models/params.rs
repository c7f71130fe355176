//! Typed key-value containers for request bodies and query arguments.
//!
//! Values are restricted to strings, numbers, nested maps and sequences.
//! Arbitrary JSON is validated when converted with [`Params::try_from`].

use indexmap::{map, IndexMap};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{Error, Result};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A string value.
    String(String),
    /// A numeric value.
    Number(Number),
    /// A nested map.
    Map(Params),
    /// A sequence of values.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Get the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is an integral number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(n: $ty) -> Self {
                    ParamValue::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<Params> for ParamValue {
    fn from(map: Params) -> Self {
        ParamValue::Map(map)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for ParamValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(ParamValue::String(s)),
            Value::Number(n) => Ok(ParamValue::Number(n)),
            Value::Object(_) => Params::try_from(value).map(ParamValue::Map),
            Value::Array(items) => items
                .into_iter()
                .map(ParamValue::try_from)
                .collect::<Result<Vec<_>>>()
                .map(ParamValue::List),
            Value::Bool(_) | Value::Null => Err(Error::InvalidInput(format!(
                "unsupported parameter value: {}",
                value
            ))),
        }
    }
}

/// A string-keyed map of parameters that keeps insertion order.
///
/// Used both as the JSON request body and as query arguments.
///
/// # Example
///
/// ```
/// use mpapi_client::Params;
///
/// let args = Params::new().with("filter", "active").with("page", 2);
/// assert_eq!(args.get("page").and_then(|v| v.as_i64()), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one for the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    /// Return a copy of `self` with every entry of `other` laid over it.
    ///
    /// Keys present in both maps take the value from `other` and keep their
    /// position in `self`; keys only in `other` are appended.
    pub fn merged(&self, other: &Params) -> Params {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Flatten into URL query pairs.
    ///
    /// Nested maps and sequences use bracket notation, so
    /// `{"filter": {"status": "active"}, "ids": [1, 2]}` becomes
    /// `filter[status]=active&ids[0]=1&ids[1]=2`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in self.iter() {
            flatten_into(key.clone(), value, &mut pairs);
        }
        pairs
    }

    /// Convert into a JSON object.
    pub fn to_json(&self) -> Value {
        // A map of strings, numbers, maps and lists always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn flatten_into(prefix: String, value: &ParamValue, pairs: &mut Vec<(String, String)>) {
    match value {
        ParamValue::String(s) => pairs.push((prefix, s.clone())),
        ParamValue::Number(n) => pairs.push((prefix, n.to_string())),
        ParamValue::Map(map) => {
            for (key, nested) in map.iter() {
                flatten_into(format!("{}[{}]", prefix, key), nested, pairs);
            }
        }
        ParamValue::List(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", prefix, index), nested, pairs);
            }
        }
    }
}

impl TryFrom<Value> for Params {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| ParamValue::try_from(value).map(|v| (key, v)))
                .collect(),
            other => Err(Error::InvalidInput(format!(
                "parameters must be a JSON object, got: {}",
                other
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merged_prefers_other() {
        let stored = Params::new().with("filter", "x").with("page", 1);
        let merged = stored.merged(&Params::new().with("page", 3));
        assert_eq!(merged, Params::new().with("filter", "x").with("page", 3));
        // The receiver is untouched.
        assert_eq!(stored.get("page").and_then(|v| v.as_i64()), Some(1));
    }

    #[test]
    fn test_query_pairs_flat() {
        let params = Params::new().with("page", 2).with("client_id", "test_abc");
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("client_id".to_string(), "test_abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let body = Params::new()
            .with("title", "Lamp")
            .with("price", 1290)
            .with("availability", "in_stock");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"title":"Lamp","price":1290,"availability":"in_stock"}"#
        );

        let merged = Params::new()
            .with("sort", "desc")
            .with("filter", "x")
            .merged(&Params::new().with("page", 2).with("sort", "asc"));
        let keys: Vec<&str> = merged.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["sort", "filter", "page"]);
        assert_eq!(merged.get("sort").and_then(|v| v.as_str()), Some("asc"));

        let mut removed = merged.clone();
        removed.remove("sort");
        let keys: Vec<&str> = removed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["filter", "page"]);
    }

    #[test]
    fn test_query_pairs_nested() {
        let params = Params::new()
            .with("filter", Params::new().with("status", "active"))
            .with("ids", vec![7, 9]);
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("filter[status]".to_string(), "active".to_string()),
                ("ids[0]".to_string(), "7".to_string()),
                ("ids[1]".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn test_try_from_json() {
        let params = Params::try_from(json!({
            "title": "Lamp",
            "price": 19.5,
            "tags": ["home", "light"],
            "dimensions": {"height": 40}
        }))
        .unwrap();
        assert_eq!(params.len(), 4);
        assert_eq!(params.get("title").and_then(|v| v.as_str()), Some("Lamp"));
        assert_eq!(
            params.to_json(),
            json!({
                "title": "Lamp",
                "price": 19.5,
                "tags": ["home", "light"],
                "dimensions": {"height": 40}
            })
        );
    }

    #[test]
    fn test_try_from_json_rejects_unsupported_shapes() {
        assert!(matches!(
            Params::try_from(json!({"active": true})),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Params::try_from(json!({"nested": {"gone": null}})),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Params::try_from(json!([1, 2])),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert!(params.contains_key("b"));
    }
}
