use std::time::Duration;

use axum::{extract::State, Json};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::warn;
use uuid::Uuid;

use crate::routes::resume::ResumeView;
use crate::state::AppState;

/// Upper bound on how long a session change waits for the reload.
const RELOAD_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/session
///
/// Signs the user in and responds once their resume has been loaded.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Json<ResumeView> {
    state.identity.sign_in(req.user_id);
    wait_for_reload(&state, Some(req.user_id)).await;
    Json(ResumeView::of(&state.store))
}

/// DELETE /api/v1/session
pub async fn handle_sign_out(State(state): State<AppState>) -> Json<ResumeView> {
    state.identity.sign_out();
    wait_for_reload(&state, None).await;
    Json(ResumeView::of(&state.store))
}

async fn wait_for_reload(state: &AppState, user_id: Option<Uuid>) {
    if timeout(RELOAD_WAIT, state.store.wait_ready(user_id))
        .await
        .is_err()
    {
        warn!("Resume reload for {user_id:?} still pending after {RELOAD_WAIT:?}");
    }
}
