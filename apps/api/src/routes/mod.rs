pub mod health;
pub mod resume;
pub mod session;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::transfer::handlers as transfer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document editing
        .route("/api/v1/resume", get(resume::handle_get_resume))
        .route(
            "/api/v1/resume/personal-info",
            patch(resume::handle_update_personal_info),
        )
        .route("/api/v1/resume/summary", put(resume::handle_update_summary))
        .route(
            "/api/v1/resume/experience",
            post(resume::handle_add_experience),
        )
        .route(
            "/api/v1/resume/experience/:id",
            patch(resume::handle_update_experience).delete(resume::handle_remove_experience),
        )
        .route(
            "/api/v1/resume/education",
            post(resume::handle_add_education),
        )
        .route(
            "/api/v1/resume/education/:id",
            patch(resume::handle_update_education).delete(resume::handle_remove_education),
        )
        .route(
            "/api/v1/resume/skills",
            put(resume::handle_replace_skills).post(resume::handle_add_skills),
        )
        .route(
            "/api/v1/resume/skills/:skill",
            delete(resume::handle_remove_skill),
        )
        .route("/api/v1/resume/template", put(resume::handle_set_template))
        .route("/api/v1/resume/language", put(resume::handle_set_language))
        .route(
            "/api/v1/resume/save-status",
            get(resume::handle_save_status),
        )
        // AI drafting
        .route(
            "/api/v1/resume/summary/generate",
            post(generation::handle_generate_summary),
        )
        .route(
            "/api/v1/resume/experience/:id/generate",
            post(generation::handle_generate_experience_description),
        )
        // Import / export
        .route("/api/v1/resume/import", post(transfer::handle_import))
        .route("/api/v1/resume/export", get(transfer::handle_export_html))
        .route(
            "/api/v1/resume/export/json",
            get(transfer::handle_export_json),
        )
        // Session
        .route(
            "/api/v1/session",
            post(session::handle_sign_in).delete(session::handle_sign_out),
        )
        .with_state(state)
}
