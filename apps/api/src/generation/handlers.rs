//! Axum route handlers for AI drafting of free-text fields.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::{generate_experience_description, generate_summary, SummaryPrompt};
use crate::models::resume::{ExperiencePatch, ResumeDocument};
use crate::state::AppState;

const DEFAULT_TITLE: &str = "professional";

#[derive(Debug, Default, Deserialize)]
pub struct GenerateSummaryRequest {
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedTextResponse {
    pub text: String,
    pub resume: ResumeDocument,
}

/// POST /api/v1/resume/summary/generate
///
/// Drafts a summary from the current name and title and stores it. Generation
/// failures still succeed, with the fallback sentence as the summary.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    body: Option<Json<GenerateSummaryRequest>>,
) -> Result<Json<GeneratedTextResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let info = state.store.document().personal_info;
    let title = if info.title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        info.title
    };

    let prompt = SummaryPrompt {
        full_name: info.full_name,
        title,
        context: request.context,
    };
    let text = generate_summary(state.generator.as_ref(), &prompt).await;
    let resume = state.store.update_summary(text.clone());

    Ok(Json(GeneratedTextResponse { text, resume }))
}

/// POST /api/v1/resume/experience/:id/generate
///
/// Drafts the description of one experience entry. The entry needs both a
/// position and a company; otherwise nothing is generated.
pub async fn handle_generate_experience_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GeneratedTextResponse>, AppError> {
    let entry = state
        .store
        .document()
        .experience
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Experience entry {id} not found")))?;

    if entry.position.trim().is_empty() || entry.company.trim().is_empty() {
        return Err(AppError::Validation(
            "Please add a position title and company name before generating a description."
                .to_string(),
        ));
    }

    let text =
        generate_experience_description(state.generator.as_ref(), &entry.position, &entry.company)
            .await;

    // The entry may have been removed while the call was in flight.
    let resume = state
        .store
        .update_experience(
            &id,
            ExperiencePatch {
                description: Some(text.clone()),
                ..Default::default()
            },
        )
        .ok_or_else(|| AppError::NotFound(format!("Experience entry {id} was removed")))?;

    Ok(Json(GeneratedTextResponse { text, resume }))
}
