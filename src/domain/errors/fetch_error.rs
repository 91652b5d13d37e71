//! Upstream fetch error types.

use thiserror::Error;

/// Errors returned by a content fetcher.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("credential rejected upstream: {message}")]
    Unauthorized { message: String },

    #[error("rate limited upstream")]
    RateLimited,

    #[error("upstream returned code {code}: {message}")]
    Api { code: i64, message: String },

    #[error("malformed upstream response: {message}")]
    Malformed { message: String },

    #[error("unexpected fetch error: {message}")]
    Unexpected { message: String },
}

impl FetchError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates API error from a non-zero response code.
    #[must_use]
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Creates malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the next cycle may succeed without user action.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimited | Self::Api { .. } | Self::Malformed { .. }
        )
    }
}
