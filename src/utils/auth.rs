//! Authentication utilities for API requests

use crate::auth::Credential;

/// Add authentication headers to an HTTP request
///
/// Azure AI model inference accepts the key either as `api-key` or as a
/// bearer token; both are sent so keys and Entra tokens work alike.
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    credential: &Credential,
) -> reqwest::RequestBuilder {
    request
        .header("api-key", credential.secret())
        .header("Authorization", format!("Bearer {}", credential.secret()))
}
