// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request gateway for the Hearth client SDK.
//!
//! Every HTTP call the SDK makes passes through [`ApiGateway`]: it runs an
//! ordered interceptor pipeline over the outbound request (bearer-token and
//! group-scoping injection by default), dispatches it, and maps the response
//! into the typed error taxonomy. A 401 clears the session and fires the
//! [`LoginRedirect`] side effect exactly once, even under concurrent
//! failures; a 409 on a version-checked mutation becomes
//! [`HearthError::Conflict`](hearth_core::HearthError) with the server's
//! current version.

pub mod client;
pub mod intercept;
pub mod redirect;
pub mod request;

pub use client::{ApiGateway, ApiRequest};
pub use intercept::{RequestInterceptor, SessionInterceptor};
pub use redirect::{LoginRedirect, TracingRedirect};
pub use request::{OutboundRequest, TenantScope};
