//! Resume Document Store: the single owner of the resume being edited.
//!
//! Load protocol: on construction and on every identity change the store enters
//! `Loading`, reads the signed-in user's remote row (falling back to local
//! storage when there is no user, no row, a fetch error or a malformed
//! payload), then becomes `Ready`.
//!
//! Once `Ready`, every mutation is mirrored to local storage immediately and,
//! with a signed-in user, upserted remotely after a quiet window.
//!
//! Known limitation: a remote fetch failure silently falls back to whatever the
//! local mirror holds, which may be older than the remote row.

pub mod debounce;
pub mod document;
pub mod local;
pub mod persistence;
pub mod remote;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::resume::{
    EducationPatch, ExperiencePatch, Language, NewEducation, NewExperience, PersonalInfoPatch,
    ResumeDocument, TemplateKind,
};
use crate::store::local::LocalStore;
use crate::store::persistence::{LocalAndRemote, LocalOnly, Persistence, SaveSignal, SaveStatus};
use crate::store::remote::{decode_record, RemoteStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Local store lock poisoned")]
    Poisoned,
}

/// Everything that is persisted together: the document plus presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub document: ResumeDocument,
    pub template: TemplateKind,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    Loading,
    Ready,
}

/// Load phase together with the identity the phase refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadState {
    pub phase: LoadPhase,
    pub user_id: Option<Uuid>,
}

pub struct ResumeStore {
    editor: Mutex<Snapshot>,
    persistence: Mutex<Arc<dyn Persistence>>,
    load_state: watch::Sender<LoadState>,
    save_signal: Arc<SaveSignal>,
    load_epoch: AtomicU64,
    local: Arc<dyn LocalStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    debounce_window: Duration,
}

impl ResumeStore {
    /// Creates an empty store in the `Loading` phase. Call `load` (or
    /// `follow_identity`) to reach `Ready`.
    pub fn new(
        local: Arc<dyn LocalStore>,
        remote: Option<Arc<dyn RemoteStore>>,
        debounce_window: Duration,
    ) -> Self {
        let (load_state, _) = watch::channel(LoadState {
            phase: LoadPhase::Loading,
            user_id: None,
        });

        Self {
            editor: Mutex::new(Snapshot::default()),
            persistence: Mutex::new(Arc::new(LocalOnly::new(local.clone()))),
            load_state,
            save_signal: Arc::new(SaveSignal::new()),
            load_epoch: AtomicU64::new(0),
            local,
            remote,
            debounce_window,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.editor().clone()
    }

    pub fn document(&self) -> ResumeDocument {
        self.editor().document.clone()
    }

    pub fn load_state(&self) -> LoadState {
        *self.load_state.borrow()
    }

    /// Remote save status. Always `Saved` when nobody is signed in.
    pub fn save_status(&self) -> SaveStatus {
        if self.current_persistence().user_id().is_none() {
            return SaveStatus::Saved;
        }
        self.save_signal.status()
    }

    /// Raw remote save-status signal, including transitions for a signed-in user.
    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.save_signal.subscribe()
    }


    // ── Load protocol ───────────────────────────────────────────────────────

    /// Runs the load protocol for `user_id`. A load overtaken by a newer one is
    /// discarded when it completes.
    pub async fn load(&self, user_id: Option<Uuid>) {
        let epoch = {
            let _editor = self.editor();
            let epoch = self.load_epoch.fetch_add(1, Ordering::SeqCst) + 1;
            self.load_state.send_replace(LoadState {
                phase: LoadPhase::Loading,
                user_id,
            });
            epoch
        };

        let (document, template, language) = self.fetch_initial(user_id).await;
        let persistence = self.strategy_for(user_id, epoch);

        let mut editor = self.editor();
        if self.load_epoch.load(Ordering::SeqCst) != epoch {
            debug!("Discarding superseded resume load for {user_id:?}");
            return;
        }

        *editor = Snapshot {
            document: document.normalized(),
            template,
            language,
        };
        self.save_signal.reset(epoch);
        if let Err(e) = local::write_snapshot(
            self.local.as_ref(),
            &editor.document,
            editor.template,
            editor.language,
        ) {
            warn!("Failed to mirror loaded resume to local storage: {e}");
        }
        *self
            .persistence
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = persistence;
        self.load_state.send_replace(LoadState {
            phase: LoadPhase::Ready,
            user_id,
        });
        info!("Resume store ready (user: {user_id:?})");
    }

    /// Reloads whenever the identity changes. Runs until the identity sender is dropped.
    pub async fn follow_identity(self: Arc<Self>, mut identity: watch::Receiver<Option<Uuid>>) {
        loop {
            let user_id = *identity.borrow_and_update();
            self.load(user_id).await;
            if identity.changed().await.is_err() {
                break;
            }
        }
    }

    /// Resolves once the store is `Ready` for exactly `user_id`.
    pub async fn wait_ready(&self, user_id: Option<Uuid>) {
        let mut rx = self.load_state.subscribe();
        let _ = rx
            .wait_for(|s| s.phase == LoadPhase::Ready && s.user_id == user_id)
            .await;
    }

    async fn fetch_initial(&self, user_id: Option<Uuid>) -> (ResumeDocument, TemplateKind, Language) {
        if let (Some(id), Some(remote)) = (user_id, &self.remote) {
            match remote.fetch(id).await {
                Ok(Some(record)) => match decode_record(&record) {
                    Ok(loaded) => {
                        info!("Loaded remote resume for user {id}");
                        return loaded;
                    }
                    Err(e) => warn!("Malformed remote resume for user {id}, using local copy: {e}"),
                },
                Ok(None) => info!("No remote resume for user {id}, using local copy"),
                Err(e) => warn!("Remote resume fetch failed for user {id}, using local copy: {e}"),
            }
        }
        local::read_snapshot(self.local.as_ref())
    }

    fn strategy_for(&self, user_id: Option<Uuid>, generation: u64) -> Arc<dyn Persistence> {
        match (user_id, &self.remote) {
            (Some(id), Some(remote)) => Arc::new(LocalAndRemote::new(
                self.local.clone(),
                remote.clone(),
                id,
                self.debounce_window,
                self.save_signal.clone(),
                generation,
            )),
            (Some(id), None) => {
                warn!("No remote store configured; user {id} will be saved locally only");
                Arc::new(LocalOnly::new(self.local.clone()))
            }
            (None, _) => Arc::new(LocalOnly::new(self.local.clone())),
        }
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    pub fn update_personal_info(&self, patch: PersonalInfoPatch) -> ResumeDocument {
        self.apply_document(|doc| doc.with_personal_info(patch))
    }

    pub fn update_summary(&self, summary: String) -> ResumeDocument {
        self.apply_document(|doc| doc.with_summary(summary))
    }

    /// Returns the id assigned to the new entry.
    pub fn add_experience(&self, input: NewExperience) -> String {
        let mut new_id = String::new();
        self.apply_document(|doc| {
            let (doc, id) = doc.with_new_experience(input);
            new_id = id;
            doc
        });
        new_id
    }

    /// `None` when no experience entry has `id`; the document is then untouched.
    pub fn update_experience(&self, id: &str, patch: ExperiencePatch) -> Option<ResumeDocument> {
        self.apply_to_entry(
            |doc| doc.experience.iter().any(|e| e.id == id),
            |doc| doc.with_experience_update(id, patch),
        )
    }

    pub fn remove_experience(&self, id: &str) -> Option<ResumeDocument> {
        self.apply_to_entry(
            |doc| doc.experience.iter().any(|e| e.id == id),
            |doc| doc.without_experience(id),
        )
    }

    /// Returns the id assigned to the new entry.
    pub fn add_education(&self, input: NewEducation) -> String {
        let mut new_id = String::new();
        self.apply_document(|doc| {
            let (doc, id) = doc.with_new_education(input);
            new_id = id;
            doc
        });
        new_id
    }

    /// `None` when no education entry has `id`; the document is then untouched.
    pub fn update_education(&self, id: &str, patch: EducationPatch) -> Option<ResumeDocument> {
        self.apply_to_entry(
            |doc| doc.education.iter().any(|e| e.id == id),
            |doc| doc.with_education_update(id, patch),
        )
    }

    pub fn remove_education(&self, id: &str) -> Option<ResumeDocument> {
        self.apply_to_entry(
            |doc| doc.education.iter().any(|e| e.id == id),
            |doc| doc.without_education(id),
        )
    }

    pub fn replace_skills(&self, skills: Vec<String>) -> ResumeDocument {
        self.apply_document(|doc| doc.with_skills(skills))
    }

    /// Merges comma-separated input into the current skills.
    pub fn add_skills(&self, input: &str) -> ResumeDocument {
        self.apply_document(|doc| doc.with_added_skills(input))
    }

    pub fn remove_skill(&self, skill: &str) -> ResumeDocument {
        self.apply_document(|doc| doc.without_skill(skill))
    }

    /// Replaces the whole document, e.g. after a validated import.
    pub fn replace_document(&self, document: ResumeDocument) -> ResumeDocument {
        self.apply_document(|_| document.normalized())
    }

    pub fn set_template(&self, template: TemplateKind) -> Snapshot {
        self.apply(|mut s| {
            s.template = template;
            s
        })
    }

    pub fn set_language(&self, language: Language) -> Snapshot {
        self.apply(|mut s| {
            s.language = language;
            s
        })
    }

    fn apply_document(&self, f: impl FnOnce(ResumeDocument) -> ResumeDocument) -> ResumeDocument {
        self.apply(|mut s| {
            s.document = f(s.document);
            s
        })
        .document
    }

    /// Applies `f` only if `exists` holds, checked under the same lock.
    fn apply_to_entry(
        &self,
        exists: impl FnOnce(&ResumeDocument) -> bool,
        f: impl FnOnce(ResumeDocument) -> ResumeDocument,
    ) -> Option<ResumeDocument> {
        let mut editor = self.editor();
        if !exists(&editor.document) {
            return None;
        }
        let next = self.commit(&mut editor, |mut s| {
            s.document = f(s.document);
            s
        });
        Some(next.document)
    }

    fn apply(&self, f: impl FnOnce(Snapshot) -> Snapshot) -> Snapshot {
        let mut editor = self.editor();
        self.commit(&mut editor, f)
    }

    /// Swaps in the next snapshot and, once ready, hands it to the active
    /// persistence strategy. The editor lock is held across `persist` so local
    /// writes land in mutation order.
    fn commit(
        &self,
        editor: &mut MutexGuard<'_, Snapshot>,
        f: impl FnOnce(Snapshot) -> Snapshot,
    ) -> Snapshot {
        let next = f(std::mem::take(&mut **editor));
        **editor = next.clone();

        if self.load_state.borrow().phase == LoadPhase::Ready {
            self.current_persistence().persist(&next);
        }
        next
    }

    fn editor(&self) -> MutexGuard<'_, Snapshot> {
        self.editor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current_persistence(&self) -> Arc<dyn Persistence> {
        self.persistence
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeRemote;
    use super::*;
    use crate::models::resume::PRESENT;
    use crate::store::local::{read_snapshot, write_snapshot, MemoryLocalStore, DATA_KEY};

    const WINDOW: Duration = Duration::from_millis(1000);

    fn store_with(
        local: Arc<MemoryLocalStore>,
        remote: Option<Arc<FakeRemote>>,
    ) -> ResumeStore {
        ResumeStore::new(
            local,
            remote.map(|r| r as Arc<dyn RemoteStore>),
            WINDOW,
        )
    }

    fn named(name: &str) -> PersonalInfoPatch {
        PersonalInfoPatch {
            full_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_load_starts_empty_with_defaults() {
        let store = store_with(Arc::new(MemoryLocalStore::default()), None);
        assert_eq!(store.load_state().phase, LoadPhase::Loading);

        store.load(None).await;

        assert_eq!(store.load_state().phase, LoadPhase::Ready);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.document, ResumeDocument::default());
        assert_eq!(snapshot.template, TemplateKind::Modern);
        assert_eq!(snapshot.language, Language::English);
    }

    #[tokio::test]
    async fn test_local_round_trip_through_a_new_store() {
        let local = Arc::new(MemoryLocalStore::default());
        let store = store_with(local.clone(), None);
        store.load(None).await;

        store.update_personal_info(named("Ada"));
        store.update_summary("Mathematician".to_string());
        let id = store.add_experience(NewExperience {
            company: "Engine Works".to_string(),
            is_current_position: true,
            ..Default::default()
        });
        store.add_skills("math, poetry, math");
        store.set_template(TemplateKind::Classic);
        store.set_language(Language::French);
        let before = store.snapshot();

        let reopened = store_with(local, None);
        reopened.load(None).await;
        assert_eq!(reopened.snapshot(), before);
        assert_eq!(reopened.document().experience[0].id, id);
        assert_eq!(reopened.document().experience[0].end_date, PRESENT);
    }

    #[tokio::test]
    async fn test_mutations_before_ready_are_not_persisted() {
        let local = Arc::new(MemoryLocalStore::default());
        let store = store_with(local.clone(), None);

        store.update_summary("draft".to_string());
        assert_eq!(local.get(DATA_KEY).unwrap(), None);

        store.load(None).await;
        // Loading replaces the in-memory document with the stored one.
        assert_eq!(store.document().summary, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_mutations_produce_one_remote_write() {
        let user = Uuid::new_v4();
        let local = Arc::new(MemoryLocalStore::default());
        let remote = Arc::new(FakeRemote::default());
        let store = store_with(local.clone(), Some(remote.clone()));
        store.load(Some(user)).await;

        for i in 0..5 {
            store.update_summary(format!("revision {i}"));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        // Local mirror is written on every change, before the remote write.
        assert_eq!(read_snapshot(local.as_ref()).0.summary, "revision 4");
        assert_eq!(remote.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(remote.write_count(), 1);
        let (written_for, snapshot) = remote.last_write().unwrap();
        assert_eq!(written_for, user);
        assert_eq!(snapshot.document.summary, "revision 4");
        assert_eq!(store.save_status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_template_and_language_changes_are_saved_remotely() {
        let user = Uuid::new_v4();
        let remote = Arc::new(FakeRemote::default());
        let store = store_with(Arc::new(MemoryLocalStore::default()), Some(remote.clone()));
        store.load(Some(user)).await;

        store.set_template(TemplateKind::Minimal);
        store.set_language(Language::Arabic);
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let (_, snapshot) = remote.last_write().unwrap();
        assert_eq!(snapshot.template, TemplateKind::Minimal);
        assert_eq!(snapshot.language, Language::Arabic);
    }

    #[tokio::test]
    async fn test_remote_record_is_adopted() {
        let user = Uuid::new_v4();
        let remote_snapshot = Snapshot {
            document: ResumeDocument::default().with_summary("from the cloud".to_string()),
            template: TemplateKind::Minimal,
            language: Language::Arabic,
        };
        let remote = Arc::new(FakeRemote::with_row(user, &remote_snapshot));
        let local = Arc::new(MemoryLocalStore::default());
        write_snapshot(
            local.as_ref(),
            &ResumeDocument::default().with_summary("stale local".to_string()),
            TemplateKind::Classic,
            Language::French,
        )
        .unwrap();

        let store = store_with(local.clone(), Some(remote));
        store.load(Some(user)).await;

        assert_eq!(store.snapshot(), remote_snapshot);
        // The loaded record is mirrored locally.
        assert_eq!(read_snapshot(local.as_ref()).0.summary, "from the cloud");
    }

    #[tokio::test]
    async fn test_remote_fetch_failure_falls_back_to_local_copy() {
        // A failed fetch silently serves the local mirror, even if the remote
        // row is newer. This is the accepted data-loss edge case.
        let user = Uuid::new_v4();
        let remote = Arc::new(FakeRemote {
            fail_fetch: true,
            ..FakeRemote::with_row(
                user,
                &Snapshot {
                    document: ResumeDocument::default().with_summary("newer remote".to_string()),
                    ..Default::default()
                },
            )
        });
        let local = Arc::new(MemoryLocalStore::default());
        write_snapshot(
            local.as_ref(),
            &ResumeDocument::default().with_summary("older local".to_string()),
            TemplateKind::Classic,
            Language::English,
        )
        .unwrap();

        let store = store_with(local, Some(remote));
        store.load(Some(user)).await;

        assert_eq!(store.load_state().phase, LoadPhase::Ready);
        assert_eq!(store.document().summary, "older local");
        assert_eq!(store.snapshot().template, TemplateKind::Classic);
    }

    #[tokio::test]
    async fn test_missing_remote_row_falls_back_to_local_copy() {
        let remote = Arc::new(FakeRemote::default());
        let local = Arc::new(MemoryLocalStore::default());
        write_snapshot(
            local.as_ref(),
            &ResumeDocument::default().with_summary("local only".to_string()),
            TemplateKind::Modern,
            Language::English,
        )
        .unwrap();

        let store = store_with(local, Some(remote));
        store.load(Some(Uuid::new_v4())).await;
        assert_eq!(store.document().summary, "local only");
    }

    #[tokio::test]
    async fn test_malformed_remote_payload_falls_back_to_local_copy() {
        let user = Uuid::new_v4();
        let remote = FakeRemote::default();
        remote.rows.lock().unwrap().push(crate::models::resume::ResumeRecord {
            user_id: user,
            data: "{broken".to_string(),
            template: "modern".to_string(),
            language: "english".to_string(),
            updated_at: chrono::Utc::now(),
        });
        let local = Arc::new(MemoryLocalStore::default());
        write_snapshot(
            local.as_ref(),
            &ResumeDocument::default().with_summary("rescued".to_string()),
            TemplateKind::Modern,
            Language::English,
        )
        .unwrap();

        let store = store_with(local, Some(Arc::new(remote)));
        store.load(Some(user)).await;
        assert_eq!(store.document().summary, "rescued");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_remote_write_sets_error_without_rollback() {
        let user = Uuid::new_v4();
        let remote = Arc::new(FakeRemote {
            fail_upsert: true,
            ..Default::default()
        });
        let store = store_with(Arc::new(MemoryLocalStore::default()), Some(remote));
        store.load(Some(user)).await;

        store.update_summary("kept".to_string());
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.save_status(), SaveStatus::Error);
        assert_eq!(store.document().summary, "kept");

        // Editing continues to work; no retry is scheduled on its own.
        store.update_summary("still editing".to_string());
        assert_eq!(store.document().summary, "still editing");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_remote_writes_without_identity() {
        let remote = Arc::new(FakeRemote::default());
        let store = store_with(Arc::new(MemoryLocalStore::default()), Some(remote.clone()));
        store.load(None).await;

        store.update_personal_info(named("Anonymous"));
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(remote.write_count(), 0);
        assert_eq!(store.save_status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_status_is_saving_while_write_in_flight() {
        struct SlowRemote;

        #[async_trait::async_trait]
        impl RemoteStore for SlowRemote {
            async fn fetch(
                &self,
                _user_id: Uuid,
            ) -> Result<Option<crate::models::resume::ResumeRecord>, StoreError> {
                Ok(None)
            }

            async fn upsert(&self, _user_id: Uuid, _snapshot: &Snapshot) -> Result<(), StoreError> {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(())
            }
        }

        let store = ResumeStore::new(
            Arc::new(MemoryLocalStore::default()),
            Some(Arc::new(SlowRemote)),
            WINDOW,
        );
        store.load(Some(Uuid::new_v4())).await;

        store.update_summary("x".to_string());
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(store.save_status(), SaveStatus::Saving);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.save_status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn test_follow_identity_reloads_on_sign_in_and_out() {
        let user = Uuid::new_v4();
        let remote = Arc::new(FakeRemote::with_row(
            user,
            &Snapshot {
                document: ResumeDocument::default().with_summary("remote".to_string()),
                ..Default::default()
            },
        ));
        let local = Arc::new(MemoryLocalStore::default());
        let store = Arc::new(store_with(local, Some(remote)));

        let (identity, rx) = watch::channel(None);
        tokio::spawn(store.clone().follow_identity(rx));

        store.wait_ready(None).await;
        assert_eq!(store.document().summary, "");

        identity.send_replace(Some(user));
        store.wait_ready(Some(user)).await;
        assert_eq!(store.document().summary, "remote");

        identity.send_replace(None);
        store.wait_ready(None).await;
        // The remote document was mirrored locally while signed in.
        assert_eq!(store.document().summary, "remote");
        assert_eq!(store.save_status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn test_replace_document_normalizes_ids() {
        let store = store_with(Arc::new(MemoryLocalStore::default()), None);
        store.load(None).await;

        let mut imported = ResumeDocument::default();
        imported.experience.push(Default::default());
        let doc = store.replace_document(imported);
        assert!(!doc.experience[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_import_forces_present_on_ongoing_entries() {
        let store = store_with(Arc::new(MemoryLocalStore::default()), None);
        store.load(None).await;

        let imported = crate::transfer::import::parse_import(
            br#"{
                "personalInfo": {},
                "experience": [{"id": "a", "isCurrent": true, "endDate": "2019"}],
                "education": [{"id": "b", "isCurrentlyStudying": true}],
                "skills": []
            }"#,
        )
        .unwrap();
        let doc = store.replace_document(imported);

        assert_eq!(doc.experience[0].end_date, PRESENT);
        assert_eq!(doc.education[0].end_date, PRESENT);
        assert_eq!(store.document(), doc);
    }

    #[tokio::test]
    async fn test_load_forces_present_on_ongoing_entries() {
        let local = Arc::new(MemoryLocalStore::default());
        let mut doc = ResumeDocument::default();
        doc.experience.push(crate::models::resume::ExperienceEntry {
            id: "a".to_string(),
            is_current_position: true,
            end_date: "2019".to_string(),
            ..Default::default()
        });
        write_snapshot(local.as_ref(), &doc, TemplateKind::Modern, Language::English).unwrap();

        let store = store_with(local.clone(), None);
        store.load(None).await;

        assert_eq!(store.document().experience[0].end_date, PRESENT);
        let (mirrored, _, _) = read_snapshot(local.as_ref());
        assert_eq!(mirrored.experience[0].end_date, PRESENT);
    }

    #[tokio::test]
    async fn test_unknown_entry_ids_report_no_match() {
        let store = store_with(Arc::new(MemoryLocalStore::default()), None);
        store.load(None).await;
        let id = store.add_experience(NewExperience::default());

        assert!(store.update_experience("missing", ExperiencePatch::default()).is_none());
        assert!(store.remove_education("missing").is_none());
        assert!(store.remove_experience(&id).is_some());
        assert!(store.remove_experience(&id).is_none());
    }

    /// Upserts take 500 ms and always fail.
    struct SlowFailingRemote;

    #[async_trait::async_trait]
    impl RemoteStore for SlowFailingRemote {
        async fn fetch(
            &self,
            _user_id: Uuid,
        ) -> Result<Option<crate::models::resume::ResumeRecord>, StoreError> {
            Ok(None)
        }

        async fn upsert(&self, _user_id: Uuid, _snapshot: &Snapshot) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Err(StoreError::Poisoned)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_previous_users_write_does_not_set_next_users_status() {
        let store = ResumeStore::new(
            Arc::new(MemoryLocalStore::default()),
            Some(Arc::new(SlowFailingRemote) as Arc<dyn RemoteStore>),
            WINDOW,
        );
        store.load(Some(Uuid::new_v4())).await;
        store.update_summary("first user".to_string());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.save_status(), SaveStatus::Saving);

        store.load(Some(Uuid::new_v4())).await;
        assert_eq!(store.save_status(), SaveStatus::Saved);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.save_status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_change_cancels_pending_remote_write() {
        let remote = Arc::new(FakeRemote::default());
        let local = Arc::new(MemoryLocalStore::default());
        let store = store_with(local.clone(), Some(remote.clone()));
        store.load(Some(Uuid::new_v4())).await;

        store.update_summary("unsent".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;
        store.load(Some(Uuid::new_v4())).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(remote.write_count(), 0);
        // The edit still reached the local mirror, which the next load adopted.
        assert_eq!(store.document().summary, "unsent");
    }
}
