//! Rate-governed access to the GitHub API.
//!
//! [`GithubClient`] is the only way requests reach the host. Every call
//! passes through [`GithubClient::before_request`], which blocks until the
//! quota of the request's resource class has at least one request left.

mod error;
mod page;
mod transport;

pub use error::HostError;
pub use octocrab::Page;
pub use page::link_target;
pub use transport::{Headers, OctocrabTransport, RawResponse, Transport};

use crate::rate_limit::{
    quota_classes, wait_if_needed, Clock, RateLimitInfo, RateLimitTable, ResourceClass,
    SystemClock, RESOURCE_HEADER,
};
use octocrab::models::RateLimit;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Path of the quota status endpoint.
pub const RATE_LIMIT_PATH: &str = "/rate_limit";

/// HTTP status the host uses for a missing resource.
const NOT_FOUND: u16 = 404;

/// GitHub API client that never issues a request while quota is exhausted.
pub struct GithubClient<T, C = SystemClock> {
    transport: T,
    clock: C,
    limits: RateLimitTable,
}

impl<T: Transport> GithubClient<T> {
    /// Creates a client using the system clock.
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, SystemClock)
    }
}

impl<T: Transport, C: Clock> GithubClient<T, C> {
    /// Creates a client with an explicit clock.
    pub fn with_clock(transport: T, clock: C) -> Self {
        Self {
            transport,
            clock,
            limits: RateLimitTable::new(),
        }
    }

    /// Returns the quota table.
    pub fn rate_limits(&self) -> &RateLimitTable {
        &self.limits
    }

    /// Returns the clock used for rate limit waits.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Blocks until at least one request against `resource` is allowed.
    ///
    /// Uses the quota recorded from the latest response headers when
    /// available and queries the host otherwise. After a wait the quota is
    /// always re-queried, so a stale table never lets a request through.
    ///
    /// # Errors
    ///
    /// Returns an error if the quota query fails.
    pub async fn before_request(&self, resource: ResourceClass) -> Result<(), HostError> {
        let mut info = match self.limits.get(resource) {
            Some(info) => info,
            None => self.query_rate_limit(resource).await?,
        };

        let mut refreshed = false;
        while info.is_exhausted() {
            let waited = wait_if_needed(&self.clock, resource, &info).await;
            if !waited && refreshed {
                // Host reports an exhausted quota whose window already ended.
                self.clock.sleep(Duration::from_secs(1)).await;
            }
            info = self.query_rate_limit(resource).await?;
            refreshed = true;
        }

        self.limits.consume(resource);
        Ok(())
    }

    /// Queries the host for the current quota and records it.
    ///
    /// The quota endpoint does not count against any quota and is therefore
    /// not guarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer lacks `resource`.
    pub async fn query_rate_limit(
        &self,
        resource: ResourceClass,
    ) -> Result<RateLimitInfo, HostError> {
        debug!(%resource, "Querying rate limit");

        let response = self.transport.get(RATE_LIMIT_PATH).await?;
        if !response.is_success() {
            return Err(response.into_status_error(RATE_LIMIT_PATH));
        }

        let rate_limit: RateLimit =
            serde_json::from_str(&response.body).map_err(|source| HostError::Json {
                url: RATE_LIMIT_PATH.to_string(),
                source,
            })?;

        let mut requested = None;
        for (class, info) in quota_classes(&rate_limit) {
            self.limits.record(class, info);
            if class == resource {
                requested = Some(info);
            }
        }

        requested.ok_or(HostError::QuotaQuery { resource })
    }

    /// Fetches a JSON document.
    ///
    /// Returns `None` if the host reports that the resource does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for any other unsuccessful status or an undecodable body.
    pub async fn fetch_json(
        &self,
        resource: ResourceClass,
        url: &str,
    ) -> Result<Option<Value>, HostError> {
        let response = self.send(resource, url).await?;

        if response.status == NOT_FOUND {
            debug!(url, "Resource not found");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(response.into_status_error(url));
        }

        response.json(url).map(Some)
    }

    /// Fetches one page of a list endpoint together with its pagination links.
    ///
    /// # Errors
    ///
    /// Returns an error for any unsuccessful status, including 404.
    pub async fn list_page(
        &self,
        resource: ResourceClass,
        url: &str,
    ) -> Result<Page<Value>, HostError> {
        let response = self.send(resource, url).await?;
        if !response.is_success() {
            return Err(response.into_status_error(url));
        }

        page::decode_page(response).await
    }

    async fn send(&self, resource: ResourceClass, url: &str) -> Result<RawResponse, HostError> {
        self.before_request(resource).await?;

        trace!(%resource, url, "GET");
        let response = self.transport.get(url).await?;
        self.observe(resource, &response.headers);
        Ok(response)
    }

    fn observe(&self, resource: ResourceClass, headers: &Headers) {
        let Some(info) = RateLimitInfo::from_headers(headers) else {
            return;
        };

        let class = match headers.get(RESOURCE_HEADER) {
            Some(name) => ResourceClass::from_name(name).unwrap_or_else(|| {
                debug!(resource = name, "Unknown rate limit resource in response");
                resource
            }),
            None => resource,
        };

        trace!(%class, remaining = info.remaining, reset = info.reset, "Rate limit updated");
        self.limits.record(class, info);
    }
}
