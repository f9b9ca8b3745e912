//! Case-insensitive header set used for signing
//!
//! Names are lower-cased on every write and lookup, so `Host`, `HOST` and
//! `host` address the same entry. A header may carry several values.

use std::collections::BTreeMap;

/// Request headers keyed by lower-cased name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, Vec<String>>,
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl HeaderSet {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to a single value, replacing earlier values
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries.insert(normalize(name.as_ref()), vec![value.into()]);
    }

    /// Set `name` to a list of values, replacing earlier values
    pub fn insert_all<I, S>(&mut self, name: impl AsRef<str>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(normalize(name.as_ref()), values.into_iter().map(Into::into).collect());
    }

    /// Add a value to `name`, keeping earlier values
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries.entry(normalize(name.as_ref())).or_default().push(value.into());
    }

    /// Builder form of [`HeaderSet::insert`]
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// All values of `name`
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.entries.get(&normalize(name)).map(Vec::as_slice)
    }

    /// First value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Whether `name` is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Remove `name`, returning its values
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.remove(&normalize(name))
    }

    /// Iterate `(lower-cased name, values)` in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderSet
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Repeated names accumulate values.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = HeaderSet::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

impl From<&http::HeaderMap> for HeaderSet {
    /// Values that are not visible ASCII are read lossily as UTF-8.
    fn from(map: &http::HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| {
                let value = match value.to_str() {
                    Ok(v) => v.to_string(),
                    Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
                };
                (name.as_str().to_string(), value)
            })
            .collect()
    }
}
