//! Pagination of list endpoints.
//!
//! Pages are decoded by octocrab's [`Page`], which reads the `Link` header
//! and accepts both plain arrays and search results wrapped in `items`.

use super::error::HostError;
use super::transport::RawResponse;
use octocrab::{FromResponse, OctoBody, Page};
use serde_json::Value;

/// Decodes a successful list response into a page of JSON items.
///
/// # Errors
///
/// Returns [`HostError::Http`] if the status or a header cannot be carried
/// over, and [`HostError::GitHubError`] if octocrab rejects the `Link`
/// header or the body.
pub(crate) async fn decode_page(response: RawResponse) -> Result<Page<Value>, HostError> {
    let mut builder = http::Response::builder().status(response.status);
    for (name, value) in response.headers.iter() {
        builder = builder.header(name, value);
    }

    let response = builder.body(OctoBody::from(response.body))?;
    Ok(Page::<Value>::from_response(response).await?)
}

/// Returns the request URL a pagination link points at.
pub fn link_target(link: &http::Uri) -> String {
    link.to_string()
}
