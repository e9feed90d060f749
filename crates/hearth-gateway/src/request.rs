// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound request representation, independent of the HTTP client.

use reqwest::Method;
use reqwest::header::HeaderMap;

/// How the active group is attached to a request.
///
/// The backend is not consistent: most endpoints read the `X-Group-Id`
/// header, some read a `group_id` query parameter. Resource clients pick
/// the form per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenantScope {
    /// Send the group as the `X-Group-Id` header (the common form).
    #[default]
    Header,
    /// Send the group as the `group_id` query parameter.
    QueryParam,
    /// The endpoint is not group-scoped (health, auth, group selection).
    None,
}

impl TenantScope {
    /// True when the request must not be sent without an active group.
    pub fn requires_group(&self) -> bool {
        !matches!(self, TenantScope::None)
    }
}

/// One outbound request as seen by the interceptor pipeline.
///
/// Constructed by [`ApiRequest`](crate::ApiRequest), mutated only by the
/// pipeline, then handed to the HTTP client. One instance per call.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Path relative to the gateway base URL, e.g. `/lists/5/items`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub tenant: TenantScope,
}

impl OutboundRequest {
    /// A new request with no query, headers, or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            tenant: TenantScope::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scope_is_header_and_requires_group() {
        let req = OutboundRequest::new(Method::GET, "/lists");
        assert_eq!(req.tenant, TenantScope::Header);
        assert!(req.tenant.requires_group());
        assert!(!TenantScope::None.requires_group());
    }
}
