//! Axum route handlers for editing the resume document.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    EducationPatch, ExperiencePatch, Language, NewEducation, NewExperience, PersonalInfoPatch,
    ResumeDocument, TemplateKind,
};
use crate::state::AppState;
use crate::store::persistence::SaveStatus;
use crate::store::{LoadPhase, ResumeStore};

/// Everything an editor needs to render itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeView {
    pub resume: ResumeDocument,
    pub template: TemplateKind,
    pub language: Language,
    pub phase: LoadPhase,
    pub user_id: Option<Uuid>,
    pub save_status: SaveStatus,
    pub exportable: bool,
}

impl ResumeView {
    pub fn of(store: &ResumeStore) -> Self {
        let snapshot = store.snapshot();
        let load = store.load_state();
        Self {
            exportable: snapshot.document.is_exportable(),
            resume: snapshot.document,
            template: snapshot.template,
            language: snapshot.language,
            phase: load.phase,
            user_id: load.user_id,
            save_status: store.save_status(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedEntryResponse {
    pub id: String,
    pub resume: ResumeDocument,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    pub skills: Vec<String>,
}

/// Comma-separated skills, e.g. `"Rust, SQL"`.
#[derive(Debug, Deserialize)]
pub struct AddSkillsRequest {
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: TemplateKind,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStatusResponse {
    pub save_status: SaveStatus,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeView> {
    Json(ResumeView::of(&state.store))
}

/// PATCH /api/v1/resume/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Json(patch): Json<PersonalInfoPatch>,
) -> Json<ResumeDocument> {
    Json(state.store.update_personal_info(patch))
}

/// PUT /api/v1/resume/summary
pub async fn handle_update_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Json<ResumeDocument> {
    Json(state.store.update_summary(req.summary))
}

/// POST /api/v1/resume/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(input): Json<NewExperience>,
) -> (StatusCode, Json<CreatedEntryResponse>) {
    let id = state.store.add_experience(input);
    let resume = state.store.document();
    (StatusCode::CREATED, Json(CreatedEntryResponse { id, resume }))
}

/// PATCH /api/v1/resume/experience/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ExperiencePatch>,
) -> Result<Json<ResumeDocument>, AppError> {
    state
        .store
        .update_experience(&id, patch)
        .map(Json)
        .ok_or_else(|| experience_not_found(&id))
}

/// DELETE /api/v1/resume/experience/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeDocument>, AppError> {
    state
        .store
        .remove_experience(&id)
        .map(Json)
        .ok_or_else(|| experience_not_found(&id))
}

/// POST /api/v1/resume/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(input): Json<NewEducation>,
) -> (StatusCode, Json<CreatedEntryResponse>) {
    let id = state.store.add_education(input);
    let resume = state.store.document();
    (StatusCode::CREATED, Json(CreatedEntryResponse { id, resume }))
}

/// PATCH /api/v1/resume/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Result<Json<ResumeDocument>, AppError> {
    state
        .store
        .update_education(&id, patch)
        .map(Json)
        .ok_or_else(|| education_not_found(&id))
}

/// DELETE /api/v1/resume/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeDocument>, AppError> {
    state
        .store
        .remove_education(&id)
        .map(Json)
        .ok_or_else(|| education_not_found(&id))
}

/// PUT /api/v1/resume/skills
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    Json(req): Json<SkillsRequest>,
) -> Json<ResumeDocument> {
    Json(state.store.replace_skills(req.skills))
}

/// POST /api/v1/resume/skills
pub async fn handle_add_skills(
    State(state): State<AppState>,
    Json(req): Json<AddSkillsRequest>,
) -> Json<ResumeDocument> {
    Json(state.store.add_skills(&req.input))
}

/// DELETE /api/v1/resume/skills/:skill
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Json<ResumeDocument> {
    Json(state.store.remove_skill(&skill))
}

/// PUT /api/v1/resume/template
pub async fn handle_set_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Json<ResumeView> {
    state.store.set_template(req.template);
    Json(ResumeView::of(&state.store))
}

/// PUT /api/v1/resume/language
pub async fn handle_set_language(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Json<ResumeView> {
    state.store.set_language(req.language);
    Json(ResumeView::of(&state.store))
}

/// GET /api/v1/resume/save-status
pub async fn handle_save_status(State(state): State<AppState>) -> Json<SaveStatusResponse> {
    Json(SaveStatusResponse {
        save_status: state.store.save_status(),
    })
}

fn experience_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Experience entry {id} not found"))
}

fn education_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Education entry {id} not found"))
}
