//! Remote record store: one row per user, whole-document upsert.
//!
//! Writes are last-write-wins. Two sessions for the same user overwrite each
//! other's latest save without any version check.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::{Language, ResumeDocument, ResumeRecord, TemplateKind};
use crate::store::{Snapshot, StoreError};

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Point lookup. `Ok(None)` when the user has never saved.
    async fn fetch(&self, user_id: Uuid) -> Result<Option<ResumeRecord>, StoreError>;

    /// Insert-or-overwrite the user's single row.
    async fn upsert(&self, user_id: Uuid, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// PostgreSQL-backed `resumes` table.
#[derive(Clone)]
pub struct PgRemoteStore {
    pool: PgPool,
}

impl PgRemoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RemoteStore for PgRemoteStore {
    async fn fetch(&self, user_id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let record = sqlx::query_as::<_, ResumeRecord>(
            "SELECT user_id, data, template, language, updated_at FROM resumes WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn upsert(&self, user_id: Uuid, snapshot: &Snapshot) -> Result<(), StoreError> {
        let data = serde_json::to_string(&snapshot.document)?;
        sqlx::query(
            r#"
            INSERT INTO resumes (user_id, data, template, language, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET data = EXCLUDED.data,
                template = EXCLUDED.template,
                language = EXCLUDED.language,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(data)
        .bind(snapshot.template.as_str())
        .bind(snapshot.language.as_str())
        .execute(&self.pool)
        .await?;

        debug!("Upserted resume record for user {user_id}");
        Ok(())
    }
}

/// Decodes a fetched record. The document must parse; an unknown template or
/// language falls back to its default.
pub fn decode_record(
    record: &ResumeRecord,
) -> Result<(ResumeDocument, TemplateKind, Language), StoreError> {
    let document: ResumeDocument = serde_json::from_str(&record.data)?;
    let template = record.template.parse().unwrap_or_default();
    let language = record.language.parse().unwrap_or_default();
    Ok((document, template, language))
}
