// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hearth client SDK.
//!
//! The taxonomy mirrors what the backend can actually answer with:
//! authentication failures, optimistic-lock conflicts, validation
//! rejections, other API errors, and transport failures. Conflicts get
//! their own variant because they are an expected, recoverable outcome of
//! concurrent editing, not an exceptional condition.

use thiserror::Error;

/// The primary error type used across all Hearth crates.
#[derive(Debug, Error)]
pub enum HearthError {
    /// Configuration errors (bad base URL, invalid header value).
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend answered 401. The session has been cleared and the
    /// login redirect side effect has already fired by the time the
    /// caller sees this.
    #[error("not authenticated")]
    Unauthenticated,

    /// A tenant-scoped request was attempted while no group is active.
    /// Caught client-side before any network call is made.
    #[error("no active group selected")]
    NoActiveGroup,

    /// A version-checked mutation was rejected because the record changed
    /// under us (HTTP 409). `current_version` is the server's version when
    /// the body carried one; callers must refetch before retrying otherwise.
    #[error("conflicting update ({code}): server version {current_version:?}")]
    Conflict {
        code: String,
        detail: Option<String>,
        current_version: Option<i64>,
    },

    /// The backend rejected the request body (HTTP 422).
    #[error("validation failed ({code}): {detail}")]
    Validation { code: String, detail: String },

    /// Any other non-2xx API response, including 5xx.
    #[error("api error {status} ({code})")]
    Api {
        status: u16,
        code: String,
        detail: Option<String>,
    },

    /// No response was observed: connect failure, timeout, or a body that
    /// could not be read. The caller decides whether to retry.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response arrived but did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// True for the optimistic-lock conflict variant.
    pub fn is_conflict(&self) -> bool {
        matches!(self, HearthError::Conflict { .. })
    }

    /// True when the session was invalidated by a 401.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, HearthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_distinguishable() {
        let err = HearthError::Conflict {
            code: "STALE_WRITE".into(),
            detail: None,
            current_version: Some(5),
        };
        assert!(err.is_conflict());
        assert!(!err.is_unauthenticated());
        assert!(err.to_string().contains("STALE_WRITE"));
    }

    #[test]
    fn api_error_carries_status_and_code() {
        let err = HearthError::Api {
            status: 500,
            code: "INTERNAL".into(),
            detail: Some("boom".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("INTERNAL"));
    }
}
