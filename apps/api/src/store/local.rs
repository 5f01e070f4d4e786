//! Local durable store: three independent string-keyed entries, read and
//! written synchronously.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::models::resume::{Language, ResumeDocument, TemplateKind};
use crate::store::StoreError;

pub const DATA_KEY: &str = "resumeData";
pub const TEMPLATE_KEY: &str = "resumeTemplate";
pub const LANGUAGE_KEY: &str = "resumeLanguage";

/// String key/value storage that survives restarts.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key inside a directory.
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write-then-rename so a crash never leaves a half-written entry.
        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

/// Process-lifetime storage. Used when no directory is configured and in tests.
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads all three entries. Never fails: a missing, unreadable or corrupt entry
/// yields its default.
pub fn read_snapshot(store: &dyn LocalStore) -> (ResumeDocument, TemplateKind, Language) {
    let document = read_entry(store, DATA_KEY)
        .and_then(|raw| match serde_json::from_str::<ResumeDocument>(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Discarding corrupt local resume data: {e}");
                None
            }
        })
        .unwrap_or_default();

    let template = read_entry(store, TEMPLATE_KEY)
        .and_then(|raw| raw.parse::<TemplateKind>().ok())
        .unwrap_or_default();

    let language = read_entry(store, LANGUAGE_KEY)
        .and_then(|raw| raw.parse::<Language>().ok())
        .unwrap_or_default();

    (document, template, language)
}

/// Writes all three entries.
pub fn write_snapshot(
    store: &dyn LocalStore,
    document: &ResumeDocument,
    template: TemplateKind,
    language: Language,
) -> Result<(), StoreError> {
    store.set(DATA_KEY, &serde_json::to_string(document)?)?;
    store.set(TEMPLATE_KEY, template.as_str())?;
    store.set(LANGUAGE_KEY, language.as_str())?;
    Ok(())
}

fn read_entry(store: &dyn LocalStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read local entry '{key}': {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{NewExperience, PersonalInfoPatch};

    fn sample_document() -> ResumeDocument {
        let (doc, _) = ResumeDocument::default()
            .with_personal_info(PersonalInfoPatch {
                full_name: Some("Ada Lovelace".to_string()),
                email: Some("ada@example.com".to_string()),
                linkedin: Some("linkedin.com/in/ada".to_string()),
                ..Default::default()
            })
            .with_summary("Analyst".to_string())
            .with_added_skills("math, poetry")
            .with_new_experience(NewExperience {
                company: "Analytical Engine".to_string(),
                position: "Programmer".to_string(),
                is_current_position: true,
                ..Default::default()
            });
        doc
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = MemoryLocalStore::default();
        let (doc, template, language) = read_snapshot(&store);
        assert_eq!(doc, ResumeDocument::default());
        assert_eq!(template, TemplateKind::Modern);
        assert_eq!(language, Language::English);
    }

    #[test]
    fn test_corrupt_entries_fall_back_independently() {
        let store = MemoryLocalStore::default();
        store.set(DATA_KEY, "{not json").unwrap();
        store.set(TEMPLATE_KEY, "classic").unwrap();
        store.set(LANGUAGE_KEY, "klingon").unwrap();

        let (doc, template, language) = read_snapshot(&store);
        assert_eq!(doc, ResumeDocument::default());
        assert_eq!(template, TemplateKind::Classic);
        assert_eq!(language, Language::English);
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryLocalStore::default();
        let doc = sample_document();
        write_snapshot(&store, &doc, TemplateKind::Minimal, Language::French).unwrap();

        let (loaded, template, language) = read_snapshot(&store);
        assert_eq!(loaded, doc);
        assert_eq!(template, TemplateKind::Minimal);
        assert_eq!(language, Language::French);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let doc = sample_document();
        {
            let store = FileLocalStore::new(dir.path()).unwrap();
            write_snapshot(&store, &doc, TemplateKind::Classic, Language::Arabic).unwrap();
        }

        let reopened = FileLocalStore::new(dir.path()).unwrap();
        let (loaded, template, language) = read_snapshot(&reopened);
        assert_eq!(loaded, doc);
        assert_eq!(template, TemplateKind::Classic);
        assert_eq!(language, Language::Arabic);
        assert!(!reopened.dir().join(".resumeData.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path().join("nested")).unwrap();
        assert_eq!(store.get(DATA_KEY).unwrap(), None);
    }
}
