// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request interceptor pipeline.
//!
//! Interceptors run in order over every outbound request before it is
//! dispatched. They receive the same session snapshot the gateway validated
//! against, so a concurrent login/logout cannot produce a request with a
//! token from one session and a group from another.
//!
//! Injection merges: an interceptor must never overwrite a header the
//! caller set explicitly on the request.

use hearth_session::Session;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use tracing::warn;

use crate::request::{OutboundRequest, TenantScope};

/// Name of the group-scoping header.
pub const GROUP_HEADER: &str = "x-group-id";
/// Name of the group-scoping query parameter.
pub const GROUP_QUERY_PARAM: &str = "group_id";

/// A hook that may amend an outbound request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    /// Amends `req` in place. `session` is the snapshot taken for this call.
    fn before_send(&self, session: &Session, req: &mut OutboundRequest);
}

/// Built-in interceptor that injects `Authorization: Bearer <token>` and
/// the group scope (header or query parameter, per the request's
/// [`TenantScope`]) from the session snapshot.
#[derive(Debug, Default)]
pub struct SessionInterceptor;

impl RequestInterceptor for SessionInterceptor {
    fn before_send(&self, session: &Session, req: &mut OutboundRequest) {
        if let Some(token) = session.token() {
            // Merge, don't replace: a per-call Authorization header wins.
            if !req.headers.contains_key(AUTHORIZATION) {
                let value = format!("Bearer {}", token.expose_secret());
                match HeaderValue::from_str(&value) {
                    Ok(mut header) => {
                        header.set_sensitive(true);
                        req.headers.insert(AUTHORIZATION, header);
                    }
                    Err(_) => warn!("bearer token is not a valid header value; skipping"),
                }
            }
        }

        let Some(group) = session.group_id() else {
            return;
        };
        match req.tenant {
            TenantScope::Header => {
                if !req.headers.contains_key(GROUP_HEADER) {
                    if let Ok(header) = HeaderValue::from_str(&group.to_string()) {
                        req.headers.insert(GROUP_HEADER, header);
                    }
                }
            }
            TenantScope::QueryParam => {
                let already_set = req.query.iter().any(|(k, _)| k == GROUP_QUERY_PARAM);
                if !already_set {
                    req.query
                        .push((GROUP_QUERY_PARAM.to_string(), group.to_string()));
                }
            }
            TenantScope::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::GroupId;
    use hearth_session::SessionStore;
    use reqwest::Method;

    fn session(token: Option<&str>, group: Option<i64>) -> std::sync::Arc<Session> {
        let store = SessionStore::new();
        if let Some(token) = token {
            store.set_session(token.into(), group.map(GroupId));
        }
        store.snapshot()
    }

    #[test]
    fn injects_bearer_and_group_header() {
        let session = session(Some("tok-1"), Some(42));
        let mut req = OutboundRequest::new(Method::GET, "/lists");
        SessionInterceptor.before_send(&session, &mut req);

        assert_eq!(
            req.headers.get(AUTHORIZATION).unwrap(),
            &HeaderValue::from_static("Bearer tok-1"),
        );
        assert_eq!(req.headers.get(GROUP_HEADER).unwrap(), "42");
    }

    #[test]
    fn group_as_query_param_when_requested() {
        let session = session(Some("tok"), Some(9));
        let mut req = OutboundRequest::new(Method::GET, "/expenses");
        req.tenant = TenantScope::QueryParam;
        SessionInterceptor.before_send(&session, &mut req);

        assert!(req.headers.get(GROUP_HEADER).is_none());
        assert_eq!(
            req.query,
            vec![("group_id".to_string(), "9".to_string())],
        );
    }

    #[test]
    fn does_not_replace_caller_headers() {
        let session = session(Some("tok"), Some(1));
        let mut req = OutboundRequest::new(Method::GET, "/lists");
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        req.headers
            .insert(GROUP_HEADER, HeaderValue::from_static("99"));
        SessionInterceptor.before_send(&session, &mut req);

        assert_eq!(req.headers.get(AUTHORIZATION).unwrap(), "Bearer other");
        assert_eq!(req.headers.get(GROUP_HEADER).unwrap(), "99");
    }

    #[test]
    fn unauthenticated_session_injects_nothing() {
        let session = session(None, None);
        let mut req = OutboundRequest::new(Method::GET, "/health");
        req.tenant = TenantScope::None;
        SessionInterceptor.before_send(&session, &mut req);

        assert!(req.headers.is_empty());
        assert!(req.query.is_empty());
    }
}
