// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state: the single source of truth for the bearer token and the
//! active group.
//!
//! [`SessionStore`] is the only cross-cutting mutable state in the SDK. It
//! is written by login, logout, group switch, and the gateway's 401 path,
//! and read by every outbound request. Reads take a lock-free snapshot of
//! the whole `(token, group)` pair, so no request can ever observe a
//! half-updated session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use hearth_core::GroupId;
use secrecy::SecretString;
use tracing::debug;

/// One immutable snapshot of the session.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    group_id: Option<GroupId>,
}

impl Session {
    /// The bearer token, if authenticated.
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The active group, if one has been selected.
    pub fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    /// True when a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("group_id", &self.group_id)
            .finish()
    }
}

/// Owner of the current [`Session`], with atomic whole-snapshot replacement.
///
/// Initialized empty at process start. Besides the session itself, the store
/// tracks one flag per unauthenticated episode: [`SessionStore::invalidate`]
/// (the 401 path) reports `true` exactly once between writes that start a
/// fresh episode, so concurrent 401 handlers agree on a single winner for
/// the login-redirect side effect. Anonymous sessions start armed, so a 401
/// on a never-authenticated session still redirects.
#[derive(Debug)]
pub struct SessionStore {
    current: ArcSwap<Session>,
    redirect_armed: AtomicBool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            current: ArcSwap::default(),
            redirect_armed: AtomicBool::new(true),
        }
    }
}

impl SessionStore {
    /// Creates an empty store (no token, no group).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session with a new token and optional active group.
    /// Starts a fresh unauthenticated episode: the next 401 redirects again.
    pub fn set_session(&self, token: SecretString, group_id: Option<GroupId>) {
        self.current.store(Arc::new(Session {
            token: Some(token),
            group_id,
        }));
        self.redirect_armed.store(true, Ordering::SeqCst);
        debug!(group = ?group_id, "session set");
    }

    /// Switches the active group, keeping the current token.
    pub fn set_group(&self, group_id: GroupId) {
        self.current.rcu(|session| {
            Arc::new(Session {
                token: session.token.clone(),
                group_id: Some(group_id),
            })
        });
        debug!(group = %group_id, "active group switched");
    }

    /// Clears the session (logout). A later 401 belongs to a new episode
    /// and redirects again.
    pub fn clear(&self) {
        self.current.store(Arc::new(Session::default()));
        self.redirect_armed.store(true, Ordering::SeqCst);
        debug!("session cleared");
    }

    /// Clears the session because the backend rejected it (the 401 path).
    /// Returns `true` for exactly one caller per unauthenticated episode;
    /// that caller fires the login-redirect side effect.
    pub fn invalidate(&self) -> bool {
        self.current.store(Arc::new(Session::default()));
        let fires = self.redirect_armed.swap(false, Ordering::SeqCst);
        if fires {
            debug!("session invalidated");
        }
        fires
    }

    /// Side-effect-free snapshot of the current session. Never blocks.
    pub fn snapshot(&self) -> Arc<Session> {
        self.current.load_full()
    }
}
