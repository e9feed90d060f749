// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The coordinator: per-key serialization of version-checked mutations.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use hearth_core::{HearthError, ResourceKey};
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::{EntityView, Phase, Slot};

/// Rejections issued at the coordinator boundary, before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// A mutation for this key is already in flight.
    #[error("mutation already in progress for {key}")]
    AlreadyPending { key: ResourceKey },

    /// The previous mutation ended in Conflicted or Failed and has not been
    /// acknowledged yet; the caller must resolve it first.
    #[error("previous mutation for {key} is unresolved")]
    Unresolved { key: ResourceKey },
}

/// Proof that a mutation was dispatched: carries the key and the sequence
/// number the completion must present.
#[derive(Debug, Clone)]
pub struct MutationTicket {
    key: ResourceKey,
    seq: u64,
    submitted_version: Option<i64>,
}

impl MutationTicket {
    /// The key this ticket is for (provisional for creations).
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// The version echoed in the update request, if this was an update.
    pub fn submitted_version(&self) -> Option<i64> {
        self.submitted_version
    }
}

/// How a completion was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Committed,
    Conflicted,
    Failed,
    /// The response was stale (a later mutation superseded this ticket) and
    /// was discarded without touching state.
    Superseded,
}

/// Result of driving one update through [`MutationCoordinator::run_update`].
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// Server accepted; local state now reflects the returned entity.
    Committed { entity: T, version: i64 },
    /// Stale version; local edit discarded, key is Conflicted until
    /// acknowledged.
    Conflicted { current_version: Option<i64> },
    /// Non-conflict failure; confirmed state untouched, key is Failed until
    /// acknowledged.
    Failed(HearthError),
    /// A later mutation won; this response was discarded.
    Superseded,
}

/// Result of driving one creation through [`MutationCoordinator::run_create`].
#[derive(Debug)]
pub enum CreateOutcome<T> {
    /// Server assigned a real key; the provisional entry was replaced.
    Created {
        key: ResourceKey,
        entity: T,
        version: i64,
    },
    /// Creation failed; the provisional entry was removed entirely.
    Failed(HearthError),
}

/// Tracks mutation state per resource key and serializes in-flight
/// mutations: at most one Pending per key, ever.
///
/// `T` is the server representation of the entity (one coordinator per
/// entity type, matching the per-domain resource clients).
#[derive(Debug)]
pub struct MutationCoordinator<T> {
    slots: DashMap<ResourceKey, Slot<T>>,
    next_seq: AtomicU64,
}

impl<T> Default for MutationCoordinator<T> {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> MutationCoordinator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the confirmed state for a key, e.g. after a fetch.
    pub fn track(&self, key: ResourceKey, entity: T, version: i64) {
        let mut slot = self.slots.entry(key).or_default();
        slot.confirmed = Some(entity);
        slot.confirmed_version = Some(version);
    }

    /// Cloned view of a key's state, or `None` if the key is untracked.
    pub fn view(&self, key: &ResourceKey) -> Option<EntityView<T>> {
        self.slots.get(key).map(|slot| EntityView::of(&slot))
    }

    /// Marks a key Pending for an update that echoes `submitted_version`.
    ///
    /// Fails fast (no network call) when the key is already Pending, or when
    /// a previous Conflicted/Failed outcome has not been acknowledged.
    pub fn begin(
        &self,
        key: ResourceKey,
        submitted_version: i64,
    ) -> Result<MutationTicket, MutationError> {
        let mut slot = self.slots.entry(key.clone()).or_default();
        match slot.phase {
            Phase::Pending { .. } => {
                return Err(MutationError::AlreadyPending { key });
            }
            Phase::Conflicted { .. } | Phase::Failed { .. } => {
                return Err(MutationError::Unresolved { key });
            }
            Phase::Idle => {}
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        slot.latest_seq = seq;
        slot.phase = Phase::Pending { seq };
        debug!(%key, seq, submitted_version, "mutation dispatched");
        Ok(MutationTicket {
            key,
            seq,
            submitted_version: Some(submitted_version),
        })
    }

    /// Marks a fresh provisional key Pending for a creation.
    pub fn begin_create(&self) -> MutationTicket {
        let key = ResourceKey::provisional();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.slots.insert(
            key.clone(),
            Slot {
                latest_seq: seq,
                phase: Phase::Pending { seq },
                ..Slot::default()
            },
        );
        debug!(%key, seq, "creation dispatched");
        MutationTicket {
            key,
            seq,
            submitted_version: None,
        }
    }

    /// Applies a successful update: adopts the server representation and the
    /// new version, returning the key to Idle. Stale tickets are discarded.
    pub fn commit(&self, ticket: &MutationTicket, entity: T, new_version: i64) -> Completion {
        let Some(mut slot) = self.slots.get_mut(&ticket.key) else {
            return Completion::Superseded;
        };
        if !slot_accepts(&slot, ticket) {
            warn!(key = %ticket.key, seq = ticket.seq, "discarding stale commit");
            return Completion::Superseded;
        }
        slot.confirmed = Some(entity);
        slot.confirmed_version = Some(new_version);
        slot.phase = Phase::Idle;
        debug!(key = %ticket.key, new_version, "mutation committed");
        Completion::Committed
    }

    /// Records a version conflict. The local edit is not applied; the key
    /// stays Conflicted (holding the server's reported version and, when the
    /// body carried one, its current representation) until acknowledged.
    pub fn conflict(
        &self,
        ticket: &MutationTicket,
        server_version: Option<i64>,
        server_state: Option<T>,
    ) -> Completion {
        let Some(mut slot) = self.slots.get_mut(&ticket.key) else {
            return Completion::Superseded;
        };
        if !slot_accepts(&slot, ticket) {
            return Completion::Superseded;
        }
        warn!(key = %ticket.key, ?server_version, "mutation conflicted");
        slot.phase = Phase::Conflicted {
            server_version,
            server_state,
        };
        Completion::Conflicted
    }

    /// Records a non-conflict failure. Confirmed state is untouched; the key
    /// stays Failed until acknowledged.
    pub fn fail(&self, ticket: &MutationTicket, error: &HearthError) -> Completion {
        let Some(mut slot) = self.slots.get_mut(&ticket.key) else {
            return Completion::Superseded;
        };
        if !slot_accepts(&slot, ticket) {
            return Completion::Superseded;
        }
        warn!(key = %ticket.key, %error, "mutation failed");
        slot.phase = Phase::Failed {
            error: error.to_string(),
        };
        Completion::Failed
    }

    /// Resolves a Conflicted or Failed key back to Idle. A conflict that
    /// carried the server's representation adopts it as the new confirmed
    /// state; otherwise the last confirmed state stands and the caller is
    /// expected to refetch. Returns `false` when there was nothing to
    /// acknowledge.
    pub fn acknowledge(&self, key: &ResourceKey) -> bool {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return false;
        };
        match std::mem::replace(&mut slot.phase, Phase::Idle) {
            Phase::Conflicted {
                server_version,
                server_state,
            } => {
                if let Some(state) = server_state {
                    slot.confirmed = Some(state);
                    slot.confirmed_version = server_version;
                }
                true
            }
            Phase::Failed { .. } => true,
            other => {
                // Not acknowledgeable; put it back.
                slot.phase = other;
                false
            }
        }
    }

    /// Replaces a provisional entry with the server-confirmed entity under
    /// its real key. The real key is inserted before the provisional entry
    /// is removed, so observers never see the entity missing entirely.
    pub fn confirm_create(
        &self,
        ticket: &MutationTicket,
        key: ResourceKey,
        entity: T,
        version: i64,
    ) -> Completion {
        {
            let Some(slot) = self.slots.get(&ticket.key) else {
                return Completion::Superseded;
            };
            if !slot_accepts(&slot, ticket) {
                return Completion::Superseded;
            }
        }
        self.slots.insert(
            key.clone(),
            Slot {
                confirmed: Some(entity),
                confirmed_version: Some(version),
                ..Slot::default()
            },
        );
        self.slots.remove(&ticket.key);
        debug!(provisional = %ticket.key, %key, "creation confirmed");
        Completion::Committed
    }

    /// Removes a provisional entry after a failed creation. Nothing of the
    /// half-created entity remains visible.
    pub fn abort_create(&self, ticket: &MutationTicket) {
        self.slots.remove(&ticket.key);
        debug!(provisional = %ticket.key, "creation aborted");
    }

    /// Drives one update end to end: begin, await the network operation,
    /// route its result into commit/conflict/fail with the stale guard.
    ///
    /// `op` receives the version to echo and resolves to the server's
    /// returned `(entity, new_version)` on success.
    pub async fn run_update<F, Fut>(
        &self,
        key: ResourceKey,
        submitted_version: i64,
        op: F,
    ) -> Result<MutationOutcome<T>, MutationError>
    where
        F: FnOnce(i64) -> Fut,
        Fut: Future<Output = Result<(T, i64), HearthError>>,
    {
        let ticket = self.begin(key, submitted_version)?;
        match op(submitted_version).await {
            Ok((entity, version)) => match self.commit(&ticket, entity.clone(), version) {
                Completion::Superseded => Ok(MutationOutcome::Superseded),
                _ => Ok(MutationOutcome::Committed { entity, version }),
            },
            Err(HearthError::Conflict {
                current_version, ..
            }) => match self.conflict(&ticket, current_version, None) {
                Completion::Superseded => Ok(MutationOutcome::Superseded),
                _ => Ok(MutationOutcome::Conflicted { current_version }),
            },
            Err(error) => match self.fail(&ticket, &error) {
                Completion::Superseded => Ok(MutationOutcome::Superseded),
                _ => Ok(MutationOutcome::Failed(error)),
            },
        }
    }

    /// Drives one creation end to end. `op` receives the provisional key
    /// (for optimistic UI display) and resolves to the server-assigned key,
    /// entity, and version.
    pub async fn run_create<F, Fut>(&self, op: F) -> CreateOutcome<T>
    where
        F: FnOnce(ResourceKey) -> Fut,
        Fut: Future<Output = Result<(ResourceKey, T, i64), HearthError>>,
    {
        let ticket = self.begin_create();
        match op(ticket.key().clone()).await {
            Ok((key, entity, version)) => {
                self.confirm_create(&ticket, key.clone(), entity.clone(), version);
                CreateOutcome::Created {
                    key,
                    entity,
                    version,
                }
            }
            Err(error) => {
                self.abort_create(&ticket);
                CreateOutcome::Failed(error)
            }
        }
    }
}

/// A completion is applied only if its ticket is still the latest dispatch
/// for the key and the key is still Pending.
fn slot_accepts<T>(slot: &Slot<T>, ticket: &MutationTicket) -> bool {
    slot.latest_seq == ticket.seq && matches!(slot.phase, Phase::Pending { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MutationStatus;
    use hearth_core::ResourceKind;

    fn item_key(id: i64) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Item, id)
    }

    #[test]
    fn second_mutation_on_pending_key_is_rejected() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(5);
        coord.track(key.clone(), "a".into(), 3);

        let ticket = coord.begin(key.clone(), 3).expect("first begin");
        let err = coord.begin(key.clone(), 3).unwrap_err();
        assert_eq!(err, MutationError::AlreadyPending { key: key.clone() });

        // A resolves with version 4 -> back to Idle at version 4.
        assert_eq!(coord.commit(&ticket, "a2".into(), 4), Completion::Committed);
        let view = coord.view(&key).unwrap();
        assert_eq!(view.status, MutationStatus::Idle);
        assert_eq!(view.confirmed_version, Some(4));
        assert_eq!(view.confirmed.as_deref(), Some("a2"));
    }

    #[test]
    fn conflict_never_adopts_submitted_version() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(5);
        coord.track(key.clone(), "original".into(), 3);

        let ticket = coord.begin(key.clone(), 3).unwrap();
        // Server is at version 5; our edit against 3 is stale.
        assert_eq!(
            coord.conflict(&ticket, Some(5), None),
            Completion::Conflicted
        );

        let view = coord.view(&key).unwrap();
        assert_eq!(view.status, MutationStatus::Conflicted);
        assert_eq!(view.conflict_version, Some(5));
        // Local edit discarded: confirmed state is still the version-3 truth.
        assert_eq!(view.confirmed.as_deref(), Some("original"));
        assert_eq!(view.confirmed_version, Some(3));

        // Without a server representation, acknowledge keeps the last
        // confirmed state; the caller refetches.
        assert!(coord.acknowledge(&key));
        let view = coord.view(&key).unwrap();
        assert_eq!(view.status, MutationStatus::Idle);
        assert_eq!(view.confirmed_version, Some(3));
    }

    #[test]
    fn acknowledge_adopts_server_state_when_conflict_carried_one() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(8);
        coord.track(key.clone(), "mine".into(), 2);

        let ticket = coord.begin(key.clone(), 2).unwrap();
        coord.conflict(&ticket, Some(6), Some("theirs".into()));
        coord.acknowledge(&key);

        let view = coord.view(&key).unwrap();
        assert_eq!(view.confirmed.as_deref(), Some("theirs"));
        assert_eq!(view.confirmed_version, Some(6));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(7);
        coord.track(key.clone(), "v1".into(), 1);

        // Request #1 times out; its response will arrive late.
        let ticket1 = coord.begin(key.clone(), 1).unwrap();
        coord.fail(
            &ticket1,
            &HearthError::Transport {
                message: "timeout".into(),
                source: None,
            },
        );
        coord.acknowledge(&key);

        // Request #2 completes normally.
        let ticket2 = coord.begin(key.clone(), 1).unwrap();
        assert_eq!(coord.commit(&ticket2, "v2".into(), 2), Completion::Committed);

        // The late response for #1 must not clobber #2's result.
        assert_eq!(
            coord.commit(&ticket1, "late".into(), 9),
            Completion::Superseded
        );
        let view = coord.view(&key).unwrap();
        assert_eq!(view.confirmed.as_deref(), Some("v2"));
        assert_eq!(view.confirmed_version, Some(2));
    }

    #[test]
    fn failure_keeps_confirmed_state_and_requires_acknowledge() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(3);
        coord.track(key.clone(), "stable".into(), 10);

        let ticket = coord.begin(key.clone(), 10).unwrap();
        coord.fail(
            &ticket,
            &HearthError::Api {
                status: 500,
                code: "INTERNAL".into(),
                detail: None,
            },
        );

        let view = coord.view(&key).unwrap();
        assert_eq!(view.status, MutationStatus::Failed);
        assert_eq!(view.confirmed.as_deref(), Some("stable"));
        assert!(view.error.as_deref().unwrap_or_default().contains("500"));

        // New mutations are rejected until the failure is acknowledged.
        assert!(matches!(
            coord.begin(key.clone(), 10),
            Err(MutationError::Unresolved { .. })
        ));
        assert!(coord.acknowledge(&key));
        assert!(coord.begin(key, 10).is_ok());
    }

    #[test]
    fn creation_replaces_provisional_on_success() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let ticket = coord.begin_create();
        let provisional = ticket.key().clone();
        assert!(provisional.is_provisional());
        assert_eq!(
            coord.view(&provisional).unwrap().status,
            MutationStatus::Pending
        );

        let real = item_key(42);
        coord.confirm_create(&ticket, real.clone(), "created".into(), 1);

        assert!(coord.view(&provisional).is_none());
        let view = coord.view(&real).unwrap();
        assert_eq!(view.status, MutationStatus::Idle);
        assert_eq!(view.confirmed.as_deref(), Some("created"));
        assert_eq!(view.confirmed_version, Some(1));
    }

    #[test]
    fn creation_failure_leaves_no_artifact() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let ticket = coord.begin_create();
        let provisional = ticket.key().clone();
        coord.abort_create(&ticket);
        assert!(coord.view(&provisional).is_none());
    }

    #[tokio::test]
    async fn run_update_routes_success() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(5);
        coord.track(key.clone(), "old".into(), 3);

        let outcome = coord
            .run_update(key.clone(), 3, |version| async move {
                assert_eq!(version, 3);
                Ok(("new".to_string(), 4))
            })
            .await
            .unwrap();

        match outcome {
            MutationOutcome::Committed { entity, version } => {
                assert_eq!(entity, "new");
                assert_eq!(version, 4);
            }
            other => panic!("expected committed, got {other:?}"),
        }
        assert_eq!(coord.view(&key).unwrap().status, MutationStatus::Idle);
    }

    #[tokio::test]
    async fn run_update_routes_conflict() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();
        let key = item_key(5);
        coord.track(key.clone(), "old".into(), 3);

        let outcome = coord
            .run_update(key.clone(), 3, |_| async {
                Err(HearthError::Conflict {
                    code: "STALE_WRITE".into(),
                    detail: None,
                    current_version: Some(5),
                })
            })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            MutationOutcome::Conflicted {
                current_version: Some(5)
            }
        ));
        let view = coord.view(&key).unwrap();
        assert_eq!(view.status, MutationStatus::Conflicted);
        assert_eq!(view.confirmed_version, Some(3));
    }

    #[tokio::test]
    async fn run_create_routes_both_paths() {
        let coord: MutationCoordinator<String> = MutationCoordinator::new();

        let outcome = coord
            .run_create(|provisional| async move {
                assert!(provisional.is_provisional());
                Ok((item_key(11), "made".to_string(), 1))
            })
            .await;
        assert!(matches!(outcome, CreateOutcome::Created { .. }));
        assert!(coord.view(&item_key(11)).is_some());

        let outcome = coord
            .run_create(|_| async {
                Err::<(ResourceKey, String, i64), _>(HearthError::Validation {
                    code: "VALIDATION_ERROR".into(),
                    detail: "name required".into(),
                })
            })
            .await;
        assert!(matches!(outcome, CreateOutcome::Failed(_)));
    }
}
