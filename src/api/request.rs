//! Canonical request construction for the Guild Wars 2 Web API.
//!
//! A `RequestBuilder` collects the endpoint, version and query parameters of
//! one logical API call and renders them to a deterministic URL string. That
//! string doubles as the cache key, so rendering has to be canonical: ids are
//! deduplicated and sorted, parameters keep insertion order, and encoding is
//! stable across calls.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Base URL for the data API.
pub const API_ORIGIN: &str = "https://api.guildwars2.com";

/// Default API version segment.
pub const API_VERSION: &str = "v2";

/// Literal `ids` token the server accepts in place of an id list.
pub const IDS_ALL: &str = "all";

/// Escape everything outside RFC 3986 unreserved characters.
/// Space must come out as `%20` (never `+`) and the id-list delimiter
/// `,` as `%2C`, so the rendered string is byte-stable.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builder for one canonical API request URL.
///
/// Parameters preserve insertion order; setting an existing name overwrites
/// its value in place. The `id` and `ids` parameters are mutually exclusive:
/// setting one removes the other.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    origin: String,
    version: String,
    endpoint: Option<String>,
    params: Vec<(String, String)>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            origin: API_ORIGIN.to_string(),
            version: API_VERSION.to_string(),
            endpoint: None,
            params: Vec::new(),
        }
    }

    pub fn origin(mut self, origin: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Set the endpoint path, e.g. `items` or `guild/{id}/treasury`.
    pub fn endpoint(mut self, path: &str) -> Self {
        self.endpoint = Some(path.trim_matches('/').to_string());
        self
    }

    /// Set a query parameter, overwriting a previous value in place so the
    /// parameter keeps its original position in the rendered string.
    pub fn param(mut self, name: &str, value: &str) -> Self {
        if let Some(pair) = self.params.iter_mut().find(|(n, _)| n == name) {
            pair.1 = value.to_string();
        } else {
            self.params.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Remove a parameter entirely; absent parameters are never rendered.
    pub fn clear_param(mut self, name: &str) -> Self {
        self.params.retain(|(n, _)| n != name);
        self
    }

    /// Set the singular `id` parameter. Clears `ids`.
    pub fn id<V: ToString>(self, value: V) -> Self {
        self.clear_param("ids").param("id", &value.to_string())
    }

    /// Set the `ids` parameter from a batch of ids.
    ///
    /// Ids are deduplicated and sorted (numerically when every id parses as
    /// an integer, lexically otherwise) before joining, so overlapping
    /// requests issued in different orders render the same cache key.
    /// Clears `id`. An empty batch clears `ids` too: parameters are never
    /// rendered with an empty value.
    pub fn ids<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let mut ids: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        if ids.is_empty() {
            return self.clear_param("id").clear_param("ids");
        }
        sort_ids(&mut ids);
        ids.dedup();
        self.clear_param("id").param("ids", &ids.join(","))
    }

    /// Request every object the endpoint exposes (`ids=all`). Clears `id`.
    pub fn ids_all(self) -> Self {
        self.clear_param("id").param("ids", IDS_ALL)
    }

    /// Set the `access_token` bearer parameter.
    pub fn auth(self, token: &str) -> Self {
        self.param("access_token", token)
    }

    /// Set the `lang` locale parameter.
    pub fn locale(self, code: &str) -> Self {
        self.param("lang", code)
    }

    /// Render the canonical URL string.
    ///
    /// Pure: the same builder state always yields the same bytes, and equal
    /// strings are treated as the same cache key downstream.
    ///
    /// # Panics
    ///
    /// Panics if no endpoint was set. That is a bug in the caller, not a
    /// recoverable condition.
    pub fn render(&self) -> String {
        let endpoint = self
            .endpoint
            .as_deref()
            .expect("RequestBuilder::render called without an endpoint");

        let mut url = format!("{}/{}/{}", self.origin, self.version, endpoint);
        for (i, (name, value)) in self.params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&utf8_percent_encode(name, QUERY_ENCODE).to_string());
            url.push('=');
            url.push_str(&utf8_percent_encode(value, QUERY_ENCODE).to_string());
        }
        url
    }
}

/// Sort ids numerically when the whole batch is numeric, lexically otherwise.
/// Mixing the two orders for one batch would produce unstable cache keys.
fn sort_ids(ids: &mut [String]) {
    let all_numeric = ids.iter().all(|s| s.parse::<u64>().is_ok());
    if all_numeric {
        ids.sort_by_key(|s| s.parse::<u64>().unwrap_or(u64::MAX));
    } else {
        ids.sort();
    }
}
