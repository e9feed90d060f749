// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles and fixtures for the Hearth workspace.
//!
//! Used as a dev-dependency by the resource clients and the binary crate;
//! not part of the public SDK surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hearth_core::GroupId;
use hearth_gateway::{ApiGateway, LoginRedirect};
use hearth_session::SessionStore;

/// Redirect sink that counts invocations instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    fired: AtomicUsize,
}

impl RecordingRedirect {
    /// Number of times the login redirect fired.
    pub fn fired(&self) -> usize {
        self.fired.load(Ordering::SeqCst)
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}

/// A session store pre-populated with a token and active group.
pub fn authed_store(token: &str, group_id: i64) -> Arc<SessionStore> {
    let store = Arc::new(SessionStore::new());
    store.set_session(token.into(), Some(GroupId(group_id)));
    store
}

/// A ready-to-use gateway against `base_url`, authenticated as
/// `test-token` in group 1, with a recording redirect sink.
pub fn test_gateway(base_url: &str) -> Arc<ApiGateway> {
    let (gateway, _, _) = test_gateway_parts(base_url);
    gateway
}

/// Like [`test_gateway`], but also returns the session store and the
/// redirect sink for assertions.
pub fn test_gateway_parts(
    base_url: &str,
) -> (Arc<ApiGateway>, Arc<SessionStore>, Arc<RecordingRedirect>) {
    let session = authed_store("test-token", 1);
    let redirect = Arc::new(RecordingRedirect::default());
    let sink: Arc<dyn LoginRedirect> = redirect.clone();
    let gateway = ApiGateway::new(base_url, Arc::clone(&session), sink)
        .expect("test gateway should build");
    (Arc::new(gateway), session, redirect)
}
