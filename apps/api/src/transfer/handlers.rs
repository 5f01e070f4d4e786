use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::render::{document_title, labels::labels_for, render_html};
use crate::state::AppState;
use crate::transfer::import::{parse_import, ImportError};

/// POST /api/v1/resume/import
///
/// Accepts the exported JSON either as the raw request body or as the `file`
/// field of a multipart upload. On any validation error the document is left
/// untouched.
pub async fn handle_import(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ResumeDocument>, AppError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let bytes = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ImportError::Upload(e.body_text()))?;
        read_file_field(multipart).await?
    } else {
        Bytes::from_request(request, &state)
            .await
            .map_err(|e| ImportError::Upload(e.body_text()))?
    };

    let document = parse_import(&bytes)?;
    let resume = state.store.replace_document(document);
    info!(
        "Imported resume with {} experience and {} education entries",
        resume.experience.len(),
        resume.education.len()
    );
    Ok(Json(resume))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Bytes, ImportError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportError::Upload(e.to_string()))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| ImportError::Upload(e.to_string()));
        }
    }
    Err(ImportError::NoFile)
}

/// GET /api/v1/resume/export
///
/// Printable HTML of the selected template. Refused until name and email are set.
pub async fn handle_export_html(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.store.snapshot();
    if !snapshot.document.is_exportable() {
        return Err(AppError::NotExportable);
    }
    let date = Utc::now().format("%Y-%m-%d").to_string();
    Ok(Html(render_html(&snapshot, &date)))
}

/// GET /api/v1/resume/export/json
pub async fn handle_export_json(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = state.store.snapshot();
    if !snapshot.document.is_exportable() {
        return Err(AppError::NotExportable);
    }

    let date = Utc::now().format("%Y-%m-%d").to_string();
    let title = document_title(&snapshot.document, &labels_for(snapshot.language), &date);
    let disposition = format!("attachment; filename=\"{}.json\"", file_stem(&title));

    Ok((
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(snapshot.document),
    )
        .into_response())
}

/// Header-safe file name: ASCII alphanumerics, `-` and `_` only.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.trim_matches('_').is_empty() {
        "resume".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem("Ada Lovelace_2024-01-01"), "Ada_Lovelace_2024-01-01");
        assert_eq!(file_stem("\"x\"/y"), "_x__y");
        assert_eq!(file_stem("السيرة"), "resume");
    }
}
