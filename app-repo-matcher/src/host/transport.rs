//! Raw HTTP access to the host API.

use super::error::HostError;
use futures::future::BoxFuture;
use octocrab::Octocrab;
use serde_json::Value;
use std::collections::BTreeMap;

/// Response headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Builds headers from name/value pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                .collect(),
        )
    }

    /// Returns the value of header `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs with lowercase names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Sets header `name`, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }
}

/// An undecoded response from the host.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Headers,
    /// Response body.
    pub body: String,
}

impl RawResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Json`] if the body is not valid JSON.
    pub fn json(&self, url: &str) -> Result<Value, HostError> {
        serde_json::from_str(&self.body).map_err(|source| HostError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// Converts an unsuccessful response into [`HostError::Status`].
    pub(crate) fn into_status_error(self, url: &str) -> HostError {
        let message = serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or(self.body);

        HostError::Status {
            status: self.status,
            url: url.to_string(),
            message,
        }
    }
}

/// Issues GET requests against the host.
///
/// `url` is either a path relative to the API root (`/repos/...`) or an
/// absolute URL taken from a pagination link. Implementations must return
/// non-2xx responses as values, not errors.
pub trait Transport: Send + Sync {
    /// Performs one GET request.
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<RawResponse, HostError>>;
}

/// [`Transport`] on top of an authenticated octocrab client.
///
/// Octocrab resolves relative paths against its base URI and follows
/// redirects, so a renamed repository answers with its canonical data.
#[derive(Clone)]
pub struct OctocrabTransport {
    octocrab: Octocrab,
}

impl OctocrabTransport {
    /// Wraps an existing client.
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Builds a client from an optional token and API base URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URI is invalid or the client cannot be built.
    pub fn build(token: Option<&str>, base_uri: Option<&str>) -> Result<Self, HostError> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        if let Some(base_uri) = base_uri {
            builder = builder.base_uri(base_uri)?;
        }
        Ok(Self::new(builder.build()?))
    }
}

impl Transport for OctocrabTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(async move {
            let response = self.octocrab._get(url).await?;
            let status = response.status().as_u16();
            let headers = Headers::from_pairs(
                response
                    .headers()
                    .iter()
                    .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
            );
            let body = self.octocrab.body_to_string(response).await?;

            Ok(RawResponse {
                status,
                headers,
                body,
            })
        })
    }
}
