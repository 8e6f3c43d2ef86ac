//! # Registrar: the single owner of the active event.
//!
//! The [`Registrar`] holds the event aggregate (info, [`Allocator`], requester
//! [`Assignments`]) behind one `tokio::sync::Mutex`, so every operation is one
//! serialized read-modify-write. Notification and persistence happen **after**
//! the lock is released.
//!
//! ## Commit path
//! ```text
//! op(args)
//!   ├─► lock state
//!   │     ├─ no event ─────────────► Err(NoActiveEvent)
//!   │     ├─ engine rejects ───────► Err(..), state untouched
//!   │     └─ ok: notices + revision += 1 + snapshot + take publish gate
//!   ├─► unlock
//!   ├─► Bus.publish(notices)        (listener ─► SubscriberSet)
//!   ├─► release publish gate
//!   └─► store.save(snapshot)        (stale revisions skipped; failure ─► SnapshotFailed)
//! ```
//!
//! Operations that changed nothing publish nothing and are not persisted.
//! Notices reach the bus in revision order, and `seq` grows along it.
//!
//! ## Example
//! ```rust
//! use seatvisor::{Config, EventInfo, NoticeKind, Registrar};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), seatvisor::RegistrarError> {
//!     let registrar = Registrar::builder(Config::default()).build();
//!     registrar.create_event(EventInfo::new("Spring Cup")).await?;
//!
//!     let mut notices = registrar.bus().subscribe();
//!     let admission = registrar.claim("user-1", "Red Foxes", 4).await?;
//!     assert_eq!(admission.admitted, 4);
//!     assert_eq!(notices.recv().await.unwrap().kind, NoticeKind::TeamAdmitted);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::allocation::{Admission, Allocator, Placement, Promotion, Removal, Resize, SizeLimit, Standing};
use crate::config::Config;
use crate::error::{AllocError, RegistrarError};
use crate::model::{EventInfo, TeamName};
use crate::notices::{Bus, Notice, NoticeKind};
use crate::store::{EventRecord, Restored, Snapshot, SnapshotStore};
use crate::subscribers::SubscriberSet;

use super::assignments::Assignments;
use super::builder::RegistrarBuilder;
use super::notify;
use super::query::{self, RosterRow, SearchHit};

/// The event aggregate.
struct ActiveEvent {
    info: EventInfo,
    alloc: Allocator,
    assignments: Assignments,
}

impl ActiveEvent {
    /// Releases every requester of a removed team.
    fn release_team(&mut self, team: &TeamName) -> Vec<Notice> {
        self.assignments
            .release_team(team)
            .into_iter()
            .map(|requester| {
                Notice::new(NoticeKind::AssignmentReleased)
                    .with_team(team.as_str())
                    .with_requester(requester)
            })
            .collect()
    }

    fn record(&self) -> EventRecord {
        EventRecord::capture(&self.info, &self.alloc, self.assignments.to_rows())
    }
}

struct State {
    event: Option<ActiveEvent>,
    revision: u64,
}

impl State {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            event: self.event.as_ref().map(ActiveEvent::record),
        }
    }
}

/// Result of one sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SweepOutcome {
    /// No event exists.
    Idle,
    /// The event had expired and was deleted.
    Expired(EventInfo),
    /// Free seats were offered to the waitlist (possibly nobody moved).
    Promoted(Vec<Promotion>),
}

/// Serialized coordinator of one event.
pub struct Registrar {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    store: Arc<dyn SnapshotStore>,
    state: Mutex<State>,
    publish_gate: Mutex<()>,
    listener_token: CancellationToken,
}

impl Registrar {
    /// Starts building a registrar.
    pub fn builder(cfg: Config) -> RegistrarBuilder {
        RegistrarBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        store: Arc<dyn SnapshotStore>,
        listener_token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            store,
            state: Mutex::new(State {
                event: None,
                revision: 0,
            }),
            publish_gate: Mutex::new(()),
            listener_token,
        }
    }

    /// Forwards bus notices to the subscriber set until the registrar is dropped.
    pub(super) fn spawn_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        let token = self.listener_token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    recv = rx.recv() => match recv {
                        Ok(notice) => set.emit_arc(Arc::new(notice)),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "notice listener lagged");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Notice bus; subscribe to observe notices directly.
    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    // === Event lifecycle ===

    /// Creates the event with the configured capacity and team size limit.
    pub async fn create_event(&self, info: EventInfo) -> Result<(), RegistrarError> {
        let capacity = self.cfg.max_slots;
        let max_team_size = self.cfg.max_team_size;
        self.commit(|slot| {
            if slot.is_some() {
                return Err(RegistrarError::EventExists);
            }
            let notice = Notice::new(NoticeKind::EventCreated)
                .with_reason(info.title.as_str())
                .with_capacity(capacity);
            info!(title = %info.title, capacity, max_team_size, "event created");
            *slot = Some(ActiveEvent {
                info,
                alloc: Allocator::new(capacity, max_team_size),
                assignments: Assignments::new(),
            });
            Ok(((), vec![notice]))
        })
        .await
    }

    /// Deletes the event with all registrations, waitlist entries and assignments.
    pub async fn delete_event(&self) -> Result<EventInfo, RegistrarError> {
        self.commit(|slot| {
            let event = slot.take().ok_or(RegistrarError::NoActiveEvent)?;
            info!(title = %event.info.title, "event deleted");
            let notice = Notice::new(NoticeKind::EventDeleted).with_reason(event.info.title.as_str());
            Ok((event.info, vec![notice]))
        })
        .await
    }

    // === Allocation ===

    /// See [`Allocator::admit`].
    pub async fn admit(&self, team: &str, seats: u32) -> Result<Admission, RegistrarError> {
        self.with_event(|event| {
            let a = event.alloc.admit(team, seats)?;
            let notices = notify::admission(&a, &event.alloc);
            Ok((a, notices))
        })
        .await
    }

    /// See [`Allocator::register`].
    pub async fn register(
        &self,
        team: &str,
        size: u32,
        placement: Placement,
    ) -> Result<Admission, RegistrarError> {
        self.with_event(|event| {
            let a = event.alloc.register(team, size, placement)?;
            let notices = notify::admission(&a, &event.alloc);
            Ok((a, notices))
        })
        .await
    }

    /// See [`Allocator::resize`].
    pub async fn resize(&self, team: &str, size: u32) -> Result<Resize, RegistrarError> {
        self.resize_with(team, size, SizeLimit::Enforce).await
    }

    /// See [`Allocator::resize_with`]. Resizing to zero also releases the team's requesters.
    pub async fn resize_with(
        &self,
        team: &str,
        size: u32,
        limit: SizeLimit,
    ) -> Result<Resize, RegistrarError> {
        self.with_event(|event| {
            let outcome = event.alloc.resize_with(team, size, limit)?;
            let mut notices = notify::resize(&outcome, &event.alloc);
            if let Resize::Removed(r) = &outcome {
                notices.extend(event.release_team(&r.team));
            }
            Ok((outcome, notices))
        })
        .await
    }

    /// See [`Allocator::remove`]. Also releases the team's requesters.
    pub async fn remove(&self, team: &str) -> Result<Removal, RegistrarError> {
        self.with_event(|event| {
            let removal = event.alloc.remove(team)?;
            let mut notices = notify::removal(&removal, None, &event.alloc);
            notices.extend(event.release_team(&removal.team));
            Ok((removal, notices))
        })
        .await
    }

    /// See [`Allocator::promote`].
    pub async fn promote(&self, freed: u32) -> Result<Vec<Promotion>, RegistrarError> {
        self.with_event(|event| {
            let promoted = event.alloc.promote(freed);
            let notices = notify::promotions(&promoted, &event.alloc);
            Ok((promoted, notices))
        })
        .await
    }

    /// See [`Allocator::expand_capacity`].
    pub async fn expand_capacity(&self, capacity: u32) -> Result<Vec<Promotion>, RegistrarError> {
        self.with_event(|event| {
            let added = capacity.saturating_sub(event.alloc.capacity());
            let promoted = event.alloc.expand_capacity(capacity)?;
            let mut notices = vec![
                Notice::new(NoticeKind::CapacityExpanded)
                    .with_capacity(capacity)
                    .with_seats(added),
            ];
            notices.extend(notify::promotions(&promoted, &event.alloc));
            Ok((promoted, notices))
        })
        .await
    }

    /// See [`Allocator::close`].
    pub async fn close(&self) -> Result<(), RegistrarError> {
        self.with_event(|event| {
            event.alloc.close()?;
            Ok(((), vec![Notice::new(NoticeKind::RegistrationClosed)]))
        })
        .await
    }

    /// See [`Allocator::open`].
    pub async fn open(&self) -> Result<Vec<Promotion>, RegistrarError> {
        self.with_event(|event| {
            let promoted = event.alloc.open()?;
            let mut notices = vec![Notice::new(NoticeKind::RegistrationOpened)];
            notices.extend(notify::promotions(&promoted, &event.alloc));
            Ok((promoted, notices))
        })
        .await
    }

    /// See [`Allocator::clamp_capacity`].
    pub async fn clamp_capacity(&self) -> Result<u32, RegistrarError> {
        self.with_event(|event| {
            let withdrawn = event.alloc.clamp_capacity();
            let notices = if withdrawn > 0 {
                vec![
                    Notice::new(NoticeKind::CapacityClamped)
                        .with_capacity(event.alloc.capacity())
                        .with_seats(withdrawn),
                ]
            } else {
                Vec::new()
            };
            Ok((withdrawn, notices))
        })
        .await
    }

    /// See [`Allocator::set_max_team_size`]. Returns the previous limit.
    pub async fn set_max_team_size(&self, limit: u32) -> Result<u32, RegistrarError> {
        self.with_event(|event| {
            let previous = event.alloc.set_max_team_size(limit)?;
            let notices = if previous == limit {
                Vec::new()
            } else {
                vec![Notice::new(NoticeKind::TeamSizeLimitChanged).with_seats(limit)]
            };
            Ok((previous, notices))
        })
        .await
    }

    /// Raises the team size limit to `Config::expanded_max_team_size`.
    ///
    /// Fails with [`AllocError::AlreadyInState`] if the limit is already at or above it.
    pub async fn raise_team_size_limit(&self) -> Result<u32, RegistrarError> {
        let expanded = self.cfg.expanded_max_team_size;
        self.with_event(|event| {
            if event.alloc.max_team_size() >= expanded {
                return Err(AllocError::AlreadyInState { state: "expanded" }.into());
            }
            let previous = event.alloc.set_max_team_size(expanded)?;
            let notice = Notice::new(NoticeKind::TeamSizeLimitChanged).with_seats(expanded);
            Ok((previous, vec![notice]))
        })
        .await
    }

    // === Requesters ===

    /// Admits `seats` for the requester's team and records the assignment.
    ///
    /// Fails with [`RegistrarError::AlreadyAssigned`] if the requester acts for
    /// a different team.
    pub async fn claim(
        &self,
        requester: &str,
        team: &str,
        seats: u32,
    ) -> Result<Admission, RegistrarError> {
        self.with_event(|event| {
            let name = TeamName::parse(team)?;
            if let Some(current) = event.assignments.team_of(requester) {
                if !current.matches(&name) {
                    return Err(RegistrarError::AlreadyAssigned {
                        requester: requester.to_string(),
                        team: current.to_string(),
                    });
                }
            }
            let a = event.alloc.admit(team, seats)?;
            event.assignments.assign(requester, a.team.clone());
            let notices = notify::admission(&a, &event.alloc);
            Ok((a, notices))
        })
        .await
    }

    /// Removes the requester's team.
    pub async fn withdraw(&self, requester: &str) -> Result<Removal, RegistrarError> {
        self.with_event(|event| {
            let team = event
                .assignments
                .team_of(requester)
                .cloned()
                .ok_or_else(|| RegistrarError::NotAssigned {
                    requester: requester.to_string(),
                })?;
            let removal = event.alloc.remove(team.as_str())?;
            let mut notices = notify::removal(&removal, Some(requester), &event.alloc);
            notices.extend(event.release_team(&removal.team));
            Ok((removal, notices))
        })
        .await
    }

    /// Drops a requester's assignment; the team keeps its seats.
    pub async fn release_requester(&self, requester: &str) -> Result<TeamName, RegistrarError> {
        self.with_event(|event| {
            let team = event
                .assignments
                .release(requester)
                .ok_or_else(|| RegistrarError::NotAssigned {
                    requester: requester.to_string(),
                })?;
            let notice = Notice::new(NoticeKind::AssignmentReleased)
                .with_team(team.as_str())
                .with_requester(requester);
            Ok((team, vec![notice]))
        })
        .await
    }

    // === Reads ===

    /// See [`Allocator::standing`].
    pub async fn standing(&self, team: &str) -> Result<Standing, RegistrarError> {
        self.read(|event| Ok(event.alloc.standing(team)?)).await
    }

    /// Team the requester acts for.
    pub async fn assignment(&self, requester: &str) -> Result<Option<TeamName>, RegistrarError> {
        self.read(|event| Ok(event.assignments.team_of(requester).cloned()))
            .await
    }

    /// Case-insensitive search over team names, team ids and requester ids.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchHit>, RegistrarError> {
        self.read(|event| Ok(query::search(&event.alloc, &event.assignments, term)?))
            .await
    }

    /// Registered teams, then the waitlist in promotion order.
    pub async fn roster(&self) -> Result<Vec<RosterRow>, RegistrarError> {
        self.read(|event| Ok(query::roster(&event.alloc, &event.assignments)))
            .await
    }

    /// Runs `f` against the event info and allocator.
    pub async fn inspect<R>(
        &self,
        f: impl FnOnce(&EventInfo, &Allocator) -> R,
    ) -> Result<R, RegistrarError> {
        self.read(|event| Ok(f(&event.info, &event.alloc))).await
    }

    /// Current state as a snapshot document.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot()
    }

    // === Persistence and sweeping ===

    /// Loads the stored snapshot, replacing the in-memory state.
    ///
    /// Returns `true` if an event was restored. Assignments to unknown teams are dropped.
    pub async fn restore(&self) -> Result<bool, RegistrarError> {
        let Some(snapshot) = self.store.load().await? else {
            return Ok(false);
        };
        let event = match snapshot.event {
            Some(record) => {
                let Restored {
                    info,
                    alloc,
                    assignments: rows,
                } = record.restore()?;
                let mut assignments = Assignments::new();
                for (requester, team) in rows {
                    match alloc.standing(&team) {
                        Ok(standing) => assignments.assign(&requester, standing.team),
                        Err(_) => warn!(%requester, %team, "dropping assignment to unknown team"),
                    }
                }
                Some(ActiveEvent {
                    info,
                    alloc,
                    assignments,
                })
            }
            None => None,
        };

        let restored = event.is_some();
        let mut state = self.state.lock().await;
        state.event = event;
        state.revision = snapshot.revision;
        info!(revision = snapshot.revision, restored, store = self.store.name(), "state restored");
        Ok(restored)
    }

    /// Sweeps with the current wall-clock time.
    pub async fn sweep(&self) -> Result<SweepOutcome, RegistrarError> {
        self.sweep_at(SystemTime::now()).await
    }

    /// Deletes the event if it expired at `now`, otherwise promotes into free seats.
    pub async fn sweep_at(&self, now: SystemTime) -> Result<SweepOutcome, RegistrarError> {
        self.commit(|slot| {
            let expired = match slot.as_ref() {
                None => return Ok((SweepOutcome::Idle, Vec::new())),
                Some(event) => event.info.is_expired(now),
            };
            if expired {
                let info = slot.take().map(|e| e.info).unwrap_or_default();
                info!(title = %info.title, "event expired");
                let notice = Notice::new(NoticeKind::EventExpired).with_reason(info.title.as_str());
                return Ok((SweepOutcome::Expired(info), vec![notice]));
            }
            let Some(event) = slot.as_mut() else {
                return Ok((SweepOutcome::Idle, Vec::new()));
            };
            let promoted = event.alloc.promote(event.alloc.available());
            let notices = notify::promotions(&promoted, &event.alloc);
            Ok((SweepOutcome::Promoted(promoted), notices))
        })
        .await
    }

    /// Writes the current state, whatever the last saved revision.
    pub async fn flush(&self) {
        let snapshot = self.snapshot().await;
        self.persist(snapshot).await;
    }

    // === Internals ===

    /// Applies `op` under the lock, then publishes its notices and persists.
    async fn commit<T>(
        &self,
        op: impl FnOnce(&mut Option<ActiveEvent>) -> Result<(T, Vec<Notice>), RegistrarError>,
    ) -> Result<T, RegistrarError> {
        let (value, notices, snapshot, gate) = {
            let mut state = self.state.lock().await;
            let (value, notices) = op(&mut state.event)?;
            if notices.is_empty() {
                return Ok(value);
            }
            state.revision += 1;
            let snapshot = state.snapshot();
            // taken before the state lock is released, so the bus sees revisions in order
            let gate = self.publish_gate.lock().await;
            (value, notices, snapshot, gate)
        };
        debug!(revision = snapshot.revision, notices = notices.len(), "committed");

        self.bus.publish_all(notices);
        drop(gate);
        self.persist(snapshot).await;
        Ok(value)
    }

    async fn with_event<T>(
        &self,
        op: impl FnOnce(&mut ActiveEvent) -> Result<(T, Vec<Notice>), RegistrarError>,
    ) -> Result<T, RegistrarError> {
        self.commit(|slot| op(slot.as_mut().ok_or(RegistrarError::NoActiveEvent)?))
            .await
    }

    async fn read<T>(
        &self,
        f: impl FnOnce(&ActiveEvent) -> Result<T, RegistrarError>,
    ) -> Result<T, RegistrarError> {
        let state = self.state.lock().await;
        f(state.event.as_ref().ok_or(RegistrarError::NoActiveEvent)?)
    }

    async fn persist(&self, snapshot: Snapshot) {
        let revision = snapshot.revision;
        match self.store.save(&snapshot).await {
            Ok(true) => {}
            Ok(false) => debug!(revision, "stale snapshot skipped"),
            Err(e) => {
                error!(revision, store = self.store.name(), error = %e, "snapshot write failed");
                self.bus.publish(
                    Notice::new(NoticeKind::SnapshotFailed)
                        .with_revision(revision)
                        .with_reason(e.to_string()),
                );
            }
        }
    }
}

impl Drop for Registrar {
    fn drop(&mut self) {
        self.listener_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::broadcast;

    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn config(max_slots: u32) -> Config {
        Config {
            max_slots,
            ..Config::default()
        }
    }

    async fn with_event(max_slots: u32) -> Arc<Registrar> {
        let registrar = Registrar::builder(config(max_slots)).build();
        registrar.create_event(EventInfo::new("Cup")).await.unwrap();
        registrar
    }

    fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<NoticeKind> {
        let mut kinds = Vec::new();
        while let Ok(n) = rx.try_recv() {
            kinds.push(n.kind);
        }
        kinds
    }

    struct FailingStore;

    #[async_trait]
    impl SnapshotStore for FailingStore {
        async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
            Ok(None)
        }
        async fn save(&self, _: &Snapshot) -> Result<bool, StoreError> {
            Err(StoreError::Corrupt {
                reason: "disk full".into(),
            })
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_event_must_exist_once() {
        let registrar = Registrar::builder(Config::default()).build();
        let err = registrar.admit("Alpha", 1).await.unwrap_err();
        assert!(matches!(err, RegistrarError::NoActiveEvent));
        assert!(matches!(registrar.roster().await, Err(RegistrarError::NoActiveEvent)));

        registrar.create_event(EventInfo::new("Cup")).await.unwrap();
        let err = registrar.create_event(EventInfo::new("Other")).await.unwrap_err();
        assert_eq!(err.as_label(), "event_exists");

        let deleted = registrar.delete_event().await.unwrap();
        assert_eq!(deleted.title, "Cup");
        assert!(matches!(registrar.delete_event().await, Err(RegistrarError::NoActiveEvent)));
    }

    #[tokio::test]
    async fn test_notices_follow_application_order() {
        let registrar = with_event(10).await;
        registrar.claim("u1", "Alpha", 6).await.unwrap();
        registrar.admit("Beta", 4).await.unwrap();

        let mut rx = registrar.bus().subscribe();
        let queued = registrar.admit("Gamma", 3).await.unwrap();
        assert_eq!((queued.admitted, queued.position), (0, Some(1)));

        let removal = registrar.remove("alpha").await.unwrap();
        assert_eq!(removal.promotions.len(), 1);
        assert_eq!(
            drain(&mut rx),
            [
                NoticeKind::TeamWaitlisted,
                NoticeKind::TeamRemoved,
                NoticeKind::TeamPromoted,
                NoticeKind::AssignmentReleased,
            ]
        );
        assert_eq!(registrar.assignment("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_claim_and_withdraw() {
        let registrar = with_event(96).await;
        registrar.claim("u1", "Alpha", 3).await.unwrap();

        let err = registrar.claim("u1", "Beta", 1).await.unwrap_err();
        assert!(matches!(err, RegistrarError::AlreadyAssigned { ref team, .. } if team == "Alpha"));

        let more = registrar.claim("u1", " ALPHA ", 2).await.unwrap();
        assert_eq!(more.registered, 5);
        registrar.claim("u2", "alpha", 1).await.unwrap();

        let removal = registrar.withdraw("u2").await.unwrap();
        assert_eq!(removal.freed_registered, 6);
        assert_eq!(registrar.assignment("u1").await.unwrap(), None);

        let err = registrar.withdraw("u1").await.unwrap_err();
        assert_eq!(err.as_label(), "not_assigned");
    }

    #[tokio::test]
    async fn test_release_requester_keeps_seats() {
        let registrar = with_event(96).await;
        registrar.claim("u1", "Alpha", 3).await.unwrap();

        let team = registrar.release_requester("u1").await.unwrap();
        assert_eq!(team.as_str(), "Alpha");
        assert_eq!(registrar.standing("alpha").await.unwrap().registered, 3);
        assert!(registrar.release_requester("u1").await.is_err());
    }

    #[tokio::test]
    async fn test_resize_to_zero_releases_requesters() {
        let registrar = with_event(96).await;
        registrar.claim("u1", "Alpha", 3).await.unwrap();

        let outcome = registrar.resize("Alpha", 0).await.unwrap();
        assert!(matches!(outcome, Resize::Removed(_)));
        assert_eq!(registrar.assignment("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshots_persist_and_restore() {
        let store = Arc::new(MemoryStore::new());
        let registrar = Registrar::builder(config(4))
            .with_store(store.clone())
            .build();
        registrar.create_event(EventInfo::new("Cup")).await.unwrap();
        registrar.claim("u1", "Alpha", 3).await.unwrap();
        registrar.admit("Beta", 2).await.unwrap();
        assert_eq!(store.revision().await, Some(3));

        // Unchanged limit: nothing to publish, nothing to persist.
        registrar.set_max_team_size(9).await.unwrap();
        assert_eq!(store.revision().await, Some(3));

        let restarted = Registrar::builder(config(4))
            .with_store(store.clone())
            .build();
        assert!(restarted.restore().await.unwrap());
        assert_eq!(restarted.snapshot().await, registrar.snapshot().await);

        let beta = restarted.standing("beta").await.unwrap();
        assert_eq!((beta.registered, beta.pending, beta.position), (1, 1, Some(1)));
        assert_eq!(
            restarted.assignment("u1").await.unwrap().map(|t| t.to_string()),
            Some("Alpha".to_string())
        );

        restarted.admit("Gamma", 1).await.unwrap();
        assert_eq!(store.revision().await, Some(4));
    }

    #[tokio::test]
    async fn test_restore_from_empty_store() {
        let registrar = Registrar::builder(Config::default()).build();
        assert!(!registrar.restore().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_save_is_published() {
        let registrar = Registrar::builder(Config::default())
            .with_store(Arc::new(FailingStore))
            .build();
        let mut rx = registrar.bus().subscribe();

        registrar.create_event(EventInfo::new("Cup")).await.unwrap();
        let created = rx.recv().await.unwrap();
        let failed = rx.recv().await.unwrap();
        assert_eq!(created.kind, NoticeKind::EventCreated);
        assert_eq!(failed.kind, NoticeKind::SnapshotFailed);
        assert_eq!(failed.revision, Some(1));

        // The commit stands.
        assert!(registrar.admit("Alpha", 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_expires_event() {
        let deadline = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let registrar = Registrar::builder(Config::default()).build();
        assert_eq!(registrar.sweep_at(deadline).await.unwrap(), SweepOutcome::Idle);

        registrar
            .create_event(EventInfo::new("Cup").with_expiry(deadline))
            .await
            .unwrap();
        registrar.admit("Alpha", 2).await.unwrap();

        let early = registrar.sweep_at(deadline - Duration::from_secs(1)).await.unwrap();
        assert_eq!(early, SweepOutcome::Promoted(Vec::new()));

        let mut rx = registrar.bus().subscribe();
        match registrar.sweep_at(deadline).await.unwrap() {
            SweepOutcome::Expired(info) => assert_eq!(info.title, "Cup"),
            other => panic!("expected expiry, got {other:?}"),
        }
        assert_eq!(drain(&mut rx), [NoticeKind::EventExpired]);
        assert!(matches!(registrar.admit("Alpha", 1).await, Err(RegistrarError::NoActiveEvent)));
    }

    #[tokio::test]
    async fn test_sweep_promotes_into_free_seats() {
        let registrar = with_event(10).await;
        registrar.register("Alpha", 4, Placement::Waitlist).await.unwrap();
        assert_eq!(registrar.standing("Alpha").await.unwrap().pending, 4);

        let SweepOutcome::Promoted(promoted) = registrar.sweep().await.unwrap() else {
            panic!("expected promotion");
        };
        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted[0].moved, 4);
        assert_eq!(registrar.standing("Alpha").await.unwrap().registered, 4);
    }

    #[tokio::test]
    async fn test_raise_team_size_limit_once() {
        let registrar = with_event(96).await;
        assert_eq!(registrar.raise_team_size_limit().await.unwrap(), 9);
        assert!(registrar.admit("Alpha", 18).await.is_ok());

        let err = registrar.raise_team_size_limit().await.unwrap_err();
        assert_eq!(
            err.as_alloc(),
            Some(&AllocError::AlreadyInState { state: "expanded" })
        );
    }

    #[tokio::test]
    async fn test_capacity_changes_publish() {
        let registrar = with_event(4).await;
        registrar.admit("Alpha", 3).await.unwrap();
        registrar.admit("Beta", 3).await.unwrap();

        let mut rx = registrar.bus().subscribe();
        let promoted = registrar.expand_capacity(5).await.unwrap();
        assert_eq!(promoted[0].moved, 1);
        assert_eq!(registrar.clamp_capacity().await.unwrap(), 0);
        registrar.close().await.unwrap();
        assert!(registrar.close().await.is_err());
        assert_eq!(
            drain(&mut rx),
            [
                NoticeKind::CapacityExpanded,
                NoticeKind::TeamPromoted,
                NoticeKind::RegistrationClosed,
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admissions_never_oversell() {
        let registrar = with_event(10).await;

        let mut handles = Vec::new();
        for i in 0..50 {
            let r = Arc::clone(&registrar);
            handles.push(tokio::spawn(async move {
                r.admit(&format!("team-{i}"), 1).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let (used, queued) = registrar
            .inspect(|_, alloc| (alloc.used_seats(), alloc.waitlist().len()))
            .await
            .unwrap();
        assert_eq!((used, queued), (10, 40));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commits_publish_in_order() {
        let registrar = with_event(10).await;
        let mut rx = registrar.bus().subscribe();

        let mut handles = Vec::new();
        for i in 0..40 {
            let r = Arc::clone(&registrar);
            handles.push(tokio::spawn(async move {
                r.admit(&format!("team-{i}"), 1).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let mut seqs = Vec::new();
        while let Ok(n) = rx.try_recv() {
            seqs.push(n.seq);
        }
        assert_eq!(seqs.len(), 40);
        assert!(seqs.windows(2).all(|w| w[0] < w[1]), "{seqs:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweeps_and_flushes() {
        let store = Arc::new(MemoryStore::new());
        let registrar = Registrar::builder(config(10))
            .with_store(store.clone())
            .build();
        registrar.create_event(EventInfo::new("Cup")).await.unwrap();
        registrar.register("Alpha", 4, Placement::Waitlist).await.unwrap();

        let token = CancellationToken::new();
        let runner = {
            let r = Arc::clone(&registrar);
            let t = token.clone();
            tokio::spawn(async move { r.run(t).await })
        };

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(registrar.standing("Alpha").await.unwrap().registered, 4);

        token.cancel();
        runner.await.unwrap();
        assert_eq!(store.revision().await, Some(3));
    }
}
