// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The gateway: builds, intercepts, dispatches, and classifies every call.

use std::sync::Arc;
use std::time::Duration;

use hearth_core::{ApiErrorBody, HearthError};
use hearth_session::SessionStore;
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::intercept::{RequestInterceptor, SessionInterceptor};
use crate::redirect::LoginRedirect;
use crate::request::{OutboundRequest, TenantScope};

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Single chokepoint for all outbound HTTP calls.
///
/// Stateless between calls apart from reading the session snapshot; any
/// number of requests may be in flight concurrently. Per-resource ordering
/// is the mutation coordinator's job, not the gateway's.
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    redirect: Arc<dyn LoginRedirect>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl ApiGateway {
    /// Creates a gateway for the given API base URL.
    ///
    /// The pipeline starts with [`SessionInterceptor`]; further interceptors
    /// can be appended with [`ApiGateway::push_interceptor`].
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, HearthError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HearthError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            redirect,
            interceptors: vec![Arc::new(SessionInterceptor)],
        })
    }

    /// Appends an interceptor to the end of the pipeline.
    pub fn push_interceptor(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// The session store this gateway reads from.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Starts a request with an arbitrary method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            gateway: self,
            inner: OutboundRequest::new(method, path),
            build_error: None,
        }
    }

    /// Starts a GET request.
    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    /// Starts a POST request.
    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PATCH, path)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }

    /// Runs the pipeline and dispatches. Returns the response only on 2xx;
    /// every other outcome is classified into [`HearthError`].
    async fn dispatch(&self, mut req: OutboundRequest) -> Result<reqwest::Response, HearthError> {
        let session = self.session.snapshot();
        if req.tenant.requires_group() && session.group_id().is_none() {
            return Err(HearthError::NoActiveGroup);
        }
        for interceptor in &self.interceptors {
            interceptor.before_send(&session, &mut req);
        }

        let url = format!("{}{}", self.base_url, req.path);
        debug!(method = %req.method, path = %req.path, "dispatching request");

        let mut builder = self
            .http
            .request(req.method.clone(), &url)
            .headers(req.headers);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| HearthError::Transport {
            message: format!("request to {} failed: {e}", req.path),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(self.classify_failure(response).await)
    }

    /// Maps a non-2xx response into the error taxonomy. Every 401 invalidates
    /// the session and redirects to login, anonymous sessions included; the
    /// store arbitrates so concurrent 401s produce exactly one side effect.
    async fn classify_failure(&self, response: reqwest::Response) -> HearthError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let body = ApiErrorBody::from_text(&text);

        match status {
            401 => {
                if self.session.invalidate() {
                    warn!("received 401; clearing session and redirecting to login");
                    self.redirect.redirect_to_login();
                }
                HearthError::Unauthenticated
            }
            409 => HearthError::Conflict {
                code: body.code_or_unknown(),
                detail: body.detail_or_message(),
                current_version: body.current_version,
            },
            422 => HearthError::Validation {
                code: body.code_or_unknown(),
                detail: body
                    .detail_or_message()
                    .unwrap_or_else(|| "validation failed".to_string()),
            },
            _ => HearthError::Api {
                status,
                code: body.code_or_unknown(),
                detail: body.detail_or_message(),
            },
        }
    }
}

/// Builder for one outbound call. Immutable once dispatched.
pub struct ApiRequest<'a> {
    gateway: &'a ApiGateway,
    inner: OutboundRequest,
    build_error: Option<String>,
}

impl ApiRequest<'_> {
    /// Appends a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.inner.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a query parameter only when `value` is set.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Sets a per-call header. Headers set here survive the interceptor
    /// pipeline untouched.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.inner.headers.insert(name, value);
            }
            _ => {
                self.build_error = Some(format!("invalid header: {name}"));
            }
        }
        self
    }

    /// Sets the JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.inner.body = Some(value),
            Err(e) => self.build_error = Some(format!("unserializable body: {e}")),
        }
        self
    }

    /// Overrides how the active group is attached (default: header).
    pub fn tenant(mut self, scope: TenantScope) -> Self {
        self.inner.tenant = scope;
        self
    }

    /// Dispatches and decodes the JSON response body.
    pub async fn send<T: DeserializeOwned>(self) -> Result<T, HearthError> {
        let response = self.dispatch().await?;
        response
            .json::<T>()
            .await
            .map_err(|e| HearthError::Decode(e.to_string()))
    }

    /// Dispatches and discards the response body (DELETE, 204s).
    pub async fn send_unit(self) -> Result<(), HearthError> {
        self.dispatch().await.map(|_| ())
    }

    async fn dispatch(self) -> Result<reqwest::Response, HearthError> {
        if let Some(error) = self.build_error {
            return Err(HearthError::Internal(error));
        }
        self.gateway.dispatch(self.inner).await
    }
}
