// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login-redirect seam for the 401 path.
//!
//! The gateway itself only clears the session; what "navigate to the login
//! entry point" means depends on the host (a TUI prompts, a web shell
//! navigates). The redirect fires at most once per unauthenticated episode
//! and never retries the original request — retry-after-reauth is a
//! user-initiated action.

use tracing::warn;

/// Side effect invoked when a response invalidates the session.
pub trait LoginRedirect: Send + Sync {
    /// Navigate the user to the login entry point.
    fn redirect_to_login(&self);
}

/// Default sink that only logs. Suitable for headless/CLI hosts where
/// re-authentication means re-running with fresh credentials.
#[derive(Debug, Default)]
pub struct TracingRedirect;

impl LoginRedirect for TracingRedirect {
    fn redirect_to_login(&self) {
        warn!("session expired; re-authentication required");
    }
}
