// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimistic-mutation coordinator for the Hearth client SDK.
//!
//! The backend version-stamps every mutable record; a stale echo is rejected
//! with a conflict. This crate enforces the client half of that protocol:
//! at most one in-flight mutation per resource key, sequence-tagged dispatch
//! so late responses can never clobber newer state, and provisional keys for
//! creations so a half-created entity is never left visible.

pub mod coordinator;
pub mod state;

pub use coordinator::{
    Completion, CreateOutcome, MutationCoordinator, MutationError, MutationOutcome, MutationTicket,
};
pub use state::{EntityView, MutationStatus};
