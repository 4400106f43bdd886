//! Header allow-list and per-request header snapshots.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderName};

/// Set of header names copied from a request into every event it produces.
///
/// Lookups are case-insensitive; events carry the name as it was configured.
#[derive(Debug, Clone, Default)]
pub struct HeaderAllowList {
    names: HashMap<HeaderName, String>,
}

impl HeaderAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a comma-separated list of names into the allow-list.
    ///
    /// Entries are trimmed and empty entries ignored. Entries that are not
    /// valid header names are logged and skipped. Returns the number of names
    /// that were newly added.
    pub fn extend_from_csv(&mut self, raw: &str) -> usize {
        let mut added = 0;
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match HeaderName::from_bytes(entry.as_bytes()) {
                Ok(name) => {
                    if !self.names.contains_key(&name) {
                        self.names.insert(name, entry.to_string());
                        added += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(header = %entry, error = %e, "Ignoring invalid forward header name");
                }
            }
        }
        added
    }

    /// Configured spellings, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Copy the allow-listed headers present on a request.
    ///
    /// The first value wins for repeated headers. Non UTF-8 values are
    /// converted lossily.
    pub fn snapshot(&self, headers: &HeaderMap) -> HashMap<String, String> {
        self.names
            .iter()
            .filter_map(|(name, spelling)| {
                headers.get(name).map(|value| {
                    (
                        spelling.clone(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extend_from_csv() {
        let mut list = HeaderAllowList::new();
        assert_eq!(list.extend_from_csv(" X-Trace , ,X-Tenant,"), 2);
        assert_eq!(list.names(), vec!["X-Tenant", "X-Trace"]);

        // Union keeps the first spelling and ignores duplicates
        assert_eq!(list.extend_from_csv("x-trace,X-Region"), 1);
        assert_eq!(list.names(), vec!["X-Region", "X-Tenant", "X-Trace"]);
    }

    #[test]
    fn test_invalid_names_are_skipped() {
        let mut list = HeaderAllowList::new();
        assert_eq!(list.extend_from_csv("bad header,X-Ok,(nope)"), 1);
        assert_eq!(list.names(), vec!["X-Ok"]);
    }

    #[test]
    fn test_snapshot_is_intersection() {
        let mut list = HeaderAllowList::new();
        list.extend_from_csv("X-Trace,X-Missing");

        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("abc123"));
        headers.insert("x-other", HeaderValue::from_static("ignored"));

        let snapshot = list.snapshot(&headers);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("X-Trace").map(String::as_str), Some("abc123"));
    }

    #[test]
    fn test_snapshot_first_value_wins() {
        let mut list = HeaderAllowList::new();
        list.extend_from_csv("X-Trace");

        let mut headers = HeaderMap::new();
        headers.append("x-trace", HeaderValue::from_static("first"));
        headers.append("x-trace", HeaderValue::from_static("second"));

        assert_eq!(list.snapshot(&headers)["X-Trace"], "first");
    }

    #[test]
    fn test_empty_list_snapshot_is_empty() {
        let list = HeaderAllowList::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("abc123"));
        assert!(list.snapshot(&headers).is_empty());
    }
}
