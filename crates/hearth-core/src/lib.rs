// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hearth client SDK.
//!
//! This crate provides the error taxonomy and the shared identifier and
//! wire-shape types used throughout the Hearth workspace. Everything that
//! crosses a crate boundary lives here.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HearthError;
pub use types::{ApiErrorBody, GroupId, Paginated, ResourceKey, ResourceKind};
