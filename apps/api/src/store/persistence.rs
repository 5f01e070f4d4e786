//! Persistence strategies, chosen whenever the signed-in identity changes.
//!
//! `LocalOnly` mirrors every change to local storage. `LocalAndRemote` does the
//! same and additionally schedules a debounced upsert of the user's remote row.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error};
use uuid::Uuid;

use crate::store::debounce::Debouncer;
use crate::store::local::{write_snapshot, LocalStore};
use crate::store::remote::RemoteStore;
use crate::store::Snapshot;

/// State of the remote leg of persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Saved,
    Saving,
    Error,
}

/// Save status shared by every strategy a store installs over its lifetime.
///
/// Each installed strategy belongs to one load generation. Only the newest
/// write of the current generation may publish; writes still in flight for
/// an earlier identity complete silently.
pub struct SaveSignal {
    status: watch::Sender<SaveStatus>,
    generation: AtomicU64,
    latest_write: AtomicU64,
}

impl SaveSignal {
    pub fn new() -> Self {
        let (status, _) = watch::channel(SaveStatus::Saved);
        Self {
            status,
            generation: AtomicU64::new(0),
            latest_write: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Hands the signal to `generation` and resets it to `Saved`.
    pub fn reset(&self, generation: u64) {
        self.status.send_modify(|status| {
            self.generation.store(generation, Ordering::SeqCst);
            *status = SaveStatus::Saved;
        });
    }

    /// Marks a write as started. Returns its sequence number, or `None` when
    /// `generation` is no longer current.
    fn begin_write(&self, generation: u64) -> Option<u64> {
        let mut seq = None;
        self.status.send_if_modified(|status| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            seq = Some(self.latest_write.fetch_add(1, Ordering::SeqCst) + 1);
            *status = SaveStatus::Saving;
            true
        });
        seq
    }

    fn finish_write(&self, generation: u64, seq: u64, outcome: SaveStatus) {
        self.status.send_if_modified(|status| {
            if self.generation.load(Ordering::SeqCst) != generation
                || self.latest_write.load(Ordering::SeqCst) != seq
            {
                return false;
            }
            *status = outcome;
            true
        });
    }
}

impl Default for SaveSignal {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Persistence: Send + Sync {
    /// Called after every change once the store is ready. Must not block on I/O
    /// beyond the synchronous local write.
    fn persist(&self, snapshot: &Snapshot);

    fn user_id(&self) -> Option<Uuid>;
}

fn mirror_locally(local: &dyn LocalStore, snapshot: &Snapshot) {
    if let Err(e) = write_snapshot(
        local,
        &snapshot.document,
        snapshot.template,
        snapshot.language,
    ) {
        error!("Failed to write resume to local storage: {e}");
    }
}

pub struct LocalOnly {
    local: Arc<dyn LocalStore>,
}

impl LocalOnly {
    pub fn new(local: Arc<dyn LocalStore>) -> Self {
        Self { local }
    }
}

impl Persistence for LocalOnly {
    fn persist(&self, snapshot: &Snapshot) {
        mirror_locally(self.local.as_ref(), snapshot);
    }

    fn user_id(&self) -> Option<Uuid> {
        None
    }
}

pub struct LocalAndRemote {
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteStore>,
    user_id: Uuid,
    debouncer: Debouncer,
    signal: Arc<SaveSignal>,
    generation: u64,
}

impl LocalAndRemote {
    pub fn new(
        local: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteStore>,
        user_id: Uuid,
        window: Duration,
        signal: Arc<SaveSignal>,
        generation: u64,
    ) -> Self {
        Self {
            local,
            remote,
            user_id,
            debouncer: Debouncer::new(window),
            signal,
            generation,
        }
    }
}

impl Persistence for LocalAndRemote {
    fn persist(&self, snapshot: &Snapshot) {
        mirror_locally(self.local.as_ref(), snapshot);

        let remote = self.remote.clone();
        let signal = self.signal.clone();
        let generation = self.generation;
        let user_id = self.user_id;
        let snapshot = snapshot.clone();

        self.debouncer.schedule(async move {
            let seq = signal.begin_write(generation);

            let outcome = match remote.upsert(user_id, &snapshot).await {
                Ok(()) => {
                    debug!("Saved resume for user {user_id}");
                    SaveStatus::Saved
                }
                Err(e) => {
                    error!("Failed to save resume for user {user_id}: {e}");
                    SaveStatus::Error
                }
            };

            if let Some(seq) = seq {
                signal.finish_write(generation, seq, outcome);
            }
        });
    }

    fn user_id(&self) -> Option<Uuid> {
        Some(self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_write_publishes_its_outcome() {
        let signal = SaveSignal::new();
        signal.reset(1);

        let first = signal.begin_write(1).unwrap();
        let second = signal.begin_write(1).unwrap();
        assert_eq!(signal.status(), SaveStatus::Saving);

        signal.finish_write(1, first, SaveStatus::Error);
        assert_eq!(signal.status(), SaveStatus::Saving);

        signal.finish_write(1, second, SaveStatus::Saved);
        assert_eq!(signal.status(), SaveStatus::Saved);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let signal = SaveSignal::new();
        signal.reset(1);
        let seq = signal.begin_write(1).unwrap();

        signal.reset(2);
        assert_eq!(signal.begin_write(1), None);
        signal.finish_write(1, seq, SaveStatus::Error);

        assert_eq!(signal.status(), SaveStatus::Saved);
    }
}
