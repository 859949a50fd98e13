//! URL utilities for building endpoint addresses from configuration.

/// Normalize a base URL by removing trailing slashes
///
/// ```
/// use foundry_compare::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://host.test/models/"), "https://host.test/models");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path without doubling slashes
///
/// ```
/// use foundry_compare::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://host.test/models/", "/chat/completions"),
///     "https://host.test/models/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Append a single `key=value` query parameter, respecting an existing query.
pub fn append_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{key}={value}")
}
