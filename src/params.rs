//! Query parameters passed to every page fetch
//!
//! `Params` is an ordered, multi-valued string map in the shape of HTML form
//! values. The iterator owns one instance and hands it to its fetcher by
//! mutable reference on every call; the fetcher is free to rewrite it so
//! cursors and offsets carry over to the next page. The iterator itself never
//! reads or edits it.

use crate::error::{Error, Result};
use crate::types::StringMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;
use url::Url;

/// Ordered multi-valued key-value parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Replace every value of `key` with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => self.entries[idx].1 = vec![value],
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Append a value to `key`, keeping existing values
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => self.entries[idx].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// First value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// All values of `key`, in insertion order
    pub fn get_all(&self, key: &str) -> &[String] {
        self.position(key)
            .map_or(&[][..], |idx| self.entries[idx].1.as_slice())
    }

    /// Parse the first value of `key`
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| Error::invalid_param(key, format!("'{raw}': {e}")))
            })
            .transpose()
    }

    /// Remove `key`, returning its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no keys are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over every `(key, value)` pair, flattening multi-valued keys
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Overwrite keys from `other`; keys only present here are kept
    pub fn merge(&mut self, other: &Params) {
        for (key, values) in &other.entries {
            match self.position(key) {
                Some(idx) => self.entries[idx].1.clone_from(values),
                None => self.entries.push((key.clone(), values.clone())),
            }
        }
    }

    /// Encode as `application/x-www-form-urlencoded`
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Decode a query string; a leading `?` is ignored
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .fold(Self::new(), |mut params, (k, v)| {
                params.add(k.into_owned(), v.into_owned());
                params
            })
    }

    /// Append these parameters to the query string of `url`
    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.iter());
    }

    /// Parse `base` and append these parameters to it
    pub fn to_url(&self, base: &str) -> Result<Url> {
        let mut url = Url::parse(base)?;
        self.apply_to(&mut url);
        Ok(url)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Params {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_query(s))
    }
}

impl From<StringMap> for Params {
    fn from(map: StringMap) -> Self {
        let mut pairs: Vec<_> = map.into_iter().collect();
        pairs.sort();
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.add(k, v);
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

/// A key maps to a single string, or to a list when it carries several values
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(ScalarValue),
    Many(Vec<ScalarValue>),
}

/// YAML and JSON scalars are accepted and stored as their string form
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<ScalarValue> for String {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Str(s) => s,
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
        }
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            if let [single] = values.as_slice() {
                map.serialize_entry(key, single)?;
            } else {
                map.serialize_entry(key, values)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = Params;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of parameter names to a value or list of values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Params, A::Error> {
                let mut params = Params::new();
                while let Some((key, value)) = access.next_entry::<String, OneOrMany>()? {
                    match value {
                        OneOrMany::One(v) => params.add(key, String::from(v)),
                        OneOrMany::Many(vs) => {
                            for v in vs {
                                params.add(key.clone(), String::from(v));
                            }
                        }
                    }
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_replaces_and_add_appends() {
        let mut params = Params::new();
        params.add("tag", "a");
        params.add("tag", "b");
        assert_eq!(params.get_all("tag"), &["a".to_string(), "b".to_string()]);

        params.set("tag", "c");
        assert_eq!(params.get_all("tag"), &["c".to_string()]);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let params = Params::new();
        assert!(params.get("nope").is_none());
        assert!(params.get_all("nope").is_empty());
        assert!(!params.contains("nope"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut params = Params::new().with("a", "1").with("b", "2");
        assert_eq!(params.remove("a"), Some(vec!["1".to_string()]));
        assert_eq!(params.remove("a"), None);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_get_parsed() {
        let params = Params::new().with("offset", "40").with("page", "two");
        assert_eq!(params.get_parsed::<u32>("offset").unwrap(), Some(40));
        assert_eq!(params.get_parsed::<u32>("limit").unwrap(), None);

        let err = params.get_parsed::<u32>("page").unwrap_err();
        assert!(matches!(err, Error::InvalidParam { ref key, .. } if key == "page"));
    }

    #[test]
    fn test_encode_keeps_insertion_order() {
        let mut params = Params::new().with("q", "rust lang").with("limit", "10");
        params.add("q", "a&b");
        assert_eq!(params.encode(), "q=rust+lang&q=a%26b&limit=10");
        assert_eq!(params.to_string(), params.encode());
    }

    #[test]
    fn test_from_query() {
        let params = Params::from_query("?q=rust+lang&tag=a&tag=b&empty=");
        assert_eq!(params.get("q"), Some("rust lang"));
        assert_eq!(params.get_all("tag").len(), 2);
        assert_eq!(params.get("empty"), Some(""));

        let parsed: Params = "x=1".parse().unwrap();
        assert_eq!(parsed.get("x"), Some("1"));
    }

    #[test]
    fn test_to_url() {
        let params = Params::new().with("symbol", "AAPL").with("limit", "5");
        let url = params.to_url("https://api.example.com/v1/quotes").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/quotes?symbol=AAPL&limit=5"
        );

        let url = Params::new().to_url("https://api.example.com/x").unwrap();
        assert_eq!(url.query(), None);

        assert!(params.to_url("not a url").is_err());
    }

    #[test]
    fn test_merge() {
        let mut base = Params::new().with("q", "rust").with("limit", "10");
        let overlay = Params::new().with("limit", "50").with("offset", "0");
        base.merge(&overlay);

        assert_eq!(base.get("q"), Some("rust"));
        assert_eq!(base.get("limit"), Some("50"));
        assert_eq!(base.get("offset"), Some("0"));
    }

    #[test]
    fn test_from_string_map_is_sorted() {
        let mut map = StringMap::new();
        map.insert("b".to_string(), "2".to_string());
        map.insert("a".to_string(), "1".to_string());
        assert_eq!(Params::from(map).encode(), "a=1&b=2");
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = "q: rust\nlimit: 25\ntag: [a, b]\nactive: true\n";
        let params: Params = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(params.get("q"), Some("rust"));
        assert_eq!(params.get("limit"), Some("25"));
        assert_eq!(params.get_all("tag"), &["a".to_string(), "b".to_string()]);
        assert_eq!(params.get("active"), Some("true"));
    }

    #[test]
    fn test_serialize_json() {
        let mut params = Params::new().with("q", "rust");
        params.add("tag", "a");
        params.add("tag", "b");

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"q": "rust", "tag": ["a", "b"]}));
    }
}
