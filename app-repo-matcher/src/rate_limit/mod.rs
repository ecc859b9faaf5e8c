//! Rate limiting utilities for GitHub API.
//!
//! This module keeps the per-resource quota table and decides how long to
//! wait before a request. The guard that applies it to every outbound call
//! lives in [`GithubClient`](crate::host::GithubClient).

mod clock;
mod info;
mod resource;

pub use clock::{Clock, SystemClock};
pub use info::{
    RateLimitInfo, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER, RESOURCE_HEADER,
};
pub use resource::ResourceClass;

use octocrab::models::RateLimit;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

/// Maximum time to wait for rate limit reset in one sleep (1 hour).
///
/// Longer waits are split; the quota is re-read after every sleep.
pub const MAX_WAIT_SECS: u64 = 3600;

/// Quota state per resource class.
///
/// Updated after every response that carries rate headers and after every
/// explicit quota query.
#[derive(Debug, Default)]
pub struct RateLimitTable {
    state: Mutex<HashMap<ResourceClass, RateLimitInfo>>,
}

impl RateLimitTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last known quota for `resource`.
    pub fn get(&self, resource: ResourceClass) -> Option<RateLimitInfo> {
        self.lock().get(&resource).copied()
    }

    /// Stores fresh quota information for `resource`.
    pub fn record(&self, resource: ResourceClass, info: RateLimitInfo) {
        self.lock().insert(resource, info);
    }

    /// Accounts for one request about to be issued against `resource`.
    ///
    /// Keeps the table conservative when responses carry no rate headers.
    pub fn consume(&self, resource: ResourceClass) {
        if let Some(info) = self.lock().get_mut(&resource) {
            info.remaining = info.remaining.saturating_sub(1);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ResourceClass, RateLimitInfo>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Waits until the window of an exhausted quota resets, returning true if we waited.
///
/// # Arguments
///
/// * `clock` - Time source used for `now` and for sleeping
/// * `resource` - Resource class the quota belongs to (for logging)
/// * `info` - Current rate limit information
///
/// # Returns
///
/// Returns `true` if we waited, `false` if no wait was needed.
pub async fn wait_if_needed<C: Clock + ?Sized>(
    clock: &C,
    resource: ResourceClass,
    info: &RateLimitInfo,
) -> bool {
    let Some(wait_secs) = info.wait_secs(clock.now()) else {
        return false;
    };

    if wait_secs > MAX_WAIT_SECS {
        warn!(
            %resource,
            wait_secs,
            max_wait = MAX_WAIT_SECS,
            "Rate limit reset too far in future, capping wait time"
        );
    }

    let actual_wait = wait_secs.min(MAX_WAIT_SECS);
    info!(
        %resource,
        remaining = info.remaining,
        reset = info.reset,
        wait_secs = actual_wait,
        "Rate limit exhausted, waiting for reset"
    );

    clock.sleep(Duration::from_secs(actual_wait)).await;
    true
}

/// Returns the quota of every tracked resource class in a `/rate_limit` answer.
///
/// `graphql` is only reported for authenticated clients.
pub(crate) fn quota_classes(rate_limit: &RateLimit) -> Vec<(ResourceClass, RateLimitInfo)> {
    let resources = &rate_limit.resources;

    [
        (ResourceClass::Core, Some(&resources.core)),
        (ResourceClass::Search, Some(&resources.search)),
        (ResourceClass::Graphql, resources.graphql.as_ref()),
    ]
    .into_iter()
    .filter_map(|(class, rate)| Some((class, RateLimitInfo::from(rate?))))
    .collect()
}
