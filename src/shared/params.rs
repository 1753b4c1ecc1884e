//! Ordered request parameters
//!
//! Parameters keep the order in which they arrived. The decision cache keys on
//! that order, so two requests carrying the same pairs in a different order
//! are deliberately treated as different requests.

use serde::Serialize;

/// Routing parameter holding the request path
pub const PATH_PARAM: &str = "path";

/// Metric reported when nothing more specific can be derived
pub const DEFAULT_METRIC: &str = "hits";

/// Inbound request parameters in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestParams(Vec<(String, String)>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter; duplicates are kept
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten pairs into `k1v1k2v2...`
    ///
    /// No separator and no canonicalization: `{a: "1", b: "2"}` and
    /// `{b: "2", a: "1"}` produce `a1b2` and `b2a1`.
    pub fn cache_key(&self) -> String {
        self.0.iter().fold(String::new(), |mut key, (k, v)| {
            key.push_str(k);
            key.push_str(v);
            key
        })
    }

    /// Path the request was routed to
    ///
    /// The routing parameter is appended after the query pairs, so the last
    /// `path` pair wins over any `path` the caller put in the query string.
    pub fn route_path(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == PATH_PARAM)
            .map(|(_, v)| v.as_str())
    }

    /// Metric to report for this request
    ///
    /// Derived from the routed path only: the first segment below `/api`
    /// names the resource being called. Query parameters never select the
    /// metric.
    pub fn metric(&self) -> &str {
        self.route_path()
            .and_then(|path| {
                let mut segments = path.split('/').filter(|segment| !segment.is_empty());
                match segments.next() {
                    Some("api") => segments.next(),
                    first => first,
                }
            })
            .unwrap_or(DEFAULT_METRIC)
    }
}

impl From<Vec<(String, String)>> for RequestParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
