//! Rate limit information.

use crate::host::Headers;
use octocrab::models::Rate;

/// Header carrying the request quota of the current window.
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";

/// Header carrying the requests left in the current window.
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Header carrying the POSIX timestamp at which the window resets.
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Header naming the resource class the other rate headers refer to.
pub const RESOURCE_HEADER: &str = "x-ratelimit-resource";

/// Rate limit information for a specific resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl From<&Rate> for RateLimitInfo {
    fn from(rate: &Rate) -> Self {
        Self {
            remaining: u32::try_from(rate.remaining).unwrap_or(u32::MAX),
            reset: rate.reset,
            limit: u32::try_from(rate.limit).unwrap_or(u32::MAX),
        }
    }
}

impl RateLimitInfo {
    /// Reads rate limit information from response headers.
    ///
    /// Returns `None` unless all three of limit, remaining and reset are
    /// present and numeric.
    pub fn from_headers(headers: &Headers) -> Option<Self> {
        let number = |name: &str| headers.get(name)?.trim().parse::<u64>().ok();

        Some(Self {
            limit: u32::try_from(number(LIMIT_HEADER)?).ok()?,
            remaining: u32::try_from(number(REMAINING_HEADER)?).ok()?,
            reset: number(RESET_HEADER)?,
        })
    }

    /// Returns true if no request may be issued in the current window.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining < 1
    }

    /// Seconds to wait before the next request, if any.
    ///
    /// The wait ends one second after the reset timestamp. `None` means the
    /// request may go out now, either because quota is left or because the
    /// reset time already passed.
    #[must_use]
    pub fn wait_secs(&self, now: u64) -> Option<u64> {
        if !self.is_exhausted() {
            return None;
        }

        let wait = i128::from(self.reset) - i128::from(now) + 1;
        u64::try_from(wait).ok().filter(|secs| *secs > 0)
    }
}
