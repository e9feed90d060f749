// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Hearth workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Identifier of the group (household) whose data a request is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub i64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of mutable, version-locked records the backend exposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    List,
    Item,
    Expense,
    Settlement,
    Chore,
    Assignment,
    Proposal,
    Pet,
    Document,
}

/// Stable identifier used to track one mutable entity's mutation state.
///
/// A key is either `Persistent` (the server has assigned an id) or
/// `Provisional` (a creation is in flight and the server id is not known
/// yet). Provisional keys are replaced by persistent ones when the server
/// confirms the creation, and removed entirely when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Persistent { kind: ResourceKind, id: i64 },
    Provisional(Uuid),
}

impl ResourceKey {
    /// Key for a server-assigned record.
    pub fn persistent(kind: ResourceKind, id: i64) -> Self {
        ResourceKey::Persistent { kind, id }
    }

    /// Fresh local key for a record the server has not confirmed yet.
    pub fn provisional() -> Self {
        ResourceKey::Provisional(Uuid::new_v4())
    }

    /// True while the server id is not known yet.
    pub fn is_provisional(&self) -> bool {
        matches!(self, ResourceKey::Provisional(_))
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKey::Persistent { kind, id } => write!(f, "{kind}:{id}"),
            ResourceKey::Provisional(uuid) => write!(f, "provisional:{uuid}"),
        }
    }
}

/// Error body the backend attaches to non-2xx responses (RFC 7807 flavored).
///
/// `current_version` is only present on optimistic-lock 409s
/// (`code = "STALE_WRITE"`). Every field is optional because proxies and
/// older deployments are not consistent about the shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
    pub message: Option<String>,
    pub status: Option<u16>,
    pub instance: Option<String>,
    pub trace_id: Option<String>,
    pub current_version: Option<i64>,
}

impl ApiErrorBody {
    /// Best-effort parse; an unparseable body yields the default (all-None).
    pub fn from_text(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The error code, or "UNKNOWN" when the body carried none.
    pub fn code_or_unknown(&self) -> String {
        self.code.clone().unwrap_or_else(|| "UNKNOWN".to_string())
    }

    /// The human-readable detail, falling back to `message`.
    pub fn detail_or_message(&self) -> Option<String> {
        self.detail.clone().or_else(|| self.message.clone())
    }
}

/// Offset-paginated envelope used by listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub has_more: bool,
}
