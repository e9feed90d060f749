// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed resource clients for the Hearth backend.
//!
//! One client per domain, each a pure path/verb/body mapping over the
//! [`ApiGateway`](hearth_gateway::ApiGateway): no business logic, no
//! retries. Side effects are exactly those of the underlying gateway call.
//! Mutable records carry a `version_id` optimistic-lock token that every
//! update body must echo; pair these clients with
//! `hearth_mutation::MutationCoordinator` to drive the conflict protocol.

pub mod chores;
pub mod documents;
pub mod finance;
pub mod governance;
pub mod lists;
pub mod pets;

pub use chores::ChoresClient;
pub use documents::DocumentsClient;
pub use finance::FinanceClient;
pub use governance::GovernanceClient;
pub use lists::ListsClient;
pub use pets::PetsClient;
