// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-key mutation state.
//!
//! Each tracked resource key moves through:
//! Idle -> Pending -> (Idle | Conflicted | Failed) -> Idle.
//! Conflicted and Failed are sticky until the caller acknowledges them,
//! which is how "disable the triggering control until resolved" is kept
//! enforceable instead of an ad hoc per-row boolean.

use strum::Display;

/// UI-facing summary of a key's mutation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MutationStatus {
    /// No mutation outstanding; `confirmed` is the last server truth.
    Idle,
    /// A mutation is in flight; further mutations on this key are rejected.
    Pending,
    /// The server rejected a stale version; the local edit was discarded.
    Conflicted,
    /// The mutation failed for a non-conflict reason; nothing was applied.
    Failed,
}

/// Internal per-key phase, carrying what each state needs.
#[derive(Debug, Clone)]
pub(crate) enum Phase<T> {
    Idle,
    Pending {
        seq: u64,
    },
    Conflicted {
        server_version: Option<i64>,
        server_state: Option<T>,
    },
    Failed {
        error: String,
    },
}

impl<T> Phase<T> {
    pub(crate) fn status(&self) -> MutationStatus {
        match self {
            Phase::Idle => MutationStatus::Idle,
            Phase::Pending { .. } => MutationStatus::Pending,
            Phase::Conflicted { .. } => MutationStatus::Conflicted,
            Phase::Failed { .. } => MutationStatus::Failed,
        }
    }
}

/// Everything the coordinator tracks for one resource key.
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
    /// Last server-confirmed representation, if any has been observed.
    pub confirmed: Option<T>,
    /// Version of `confirmed`.
    pub confirmed_version: Option<i64>,
    /// Sequence number of the most recently dispatched mutation for this
    /// key. Completions carrying an older sequence are discarded.
    pub latest_seq: u64,
    pub phase: Phase<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            confirmed: None,
            confirmed_version: None,
            latest_seq: 0,
            phase: Phase::Idle,
        }
    }
}

/// Cloned view of a slot, for UI state and assertions.
#[derive(Debug, Clone)]
pub struct EntityView<T> {
    pub status: MutationStatus,
    pub confirmed: Option<T>,
    pub confirmed_version: Option<i64>,
    /// Server version reported by the last conflict, while Conflicted.
    pub conflict_version: Option<i64>,
    /// Error message of the last failure, while Failed.
    pub error: Option<String>,
}

impl<T: Clone> EntityView<T> {
    pub(crate) fn of(slot: &Slot<T>) -> Self {
        let (conflict_version, error) = match &slot.phase {
            Phase::Conflicted { server_version, .. } => (*server_version, None),
            Phase::Failed { error } => (None, Some(error.clone())),
            _ => (None, None),
        };
        Self {
            status: slot.phase.status(),
            confirmed: slot.confirmed.clone(),
            confirmed_version: slot.confirmed_version,
            conflict_version,
            error,
        }
    }
}
