//! Voice-over API endpoints.
//!
//! The server stores the narration record; speech synthesis and audio capture
//! happen client side.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::models::{Slide, VoiceOver};
use crate::AppState;

/// PUT /api/presentations/:id/slides/:slide_id/voiceover - Attach or replace
/// a slide's voice-over. Replacement discards the previous mode's data.
pub async fn set_voice_over(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
    Json(voice_over): Json<VoiceOver>,
) -> ApiResult<Slide> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.set_voice_over(&id, &slide_id, voice_over).await {
        Ok((_, slide)) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(slide, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/presentations/:id/slides/:slide_id/voiceover - Remove a
/// slide's voice-over. Idempotent.
pub async fn clear_voice_over(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.clear_voice_over(&id, &slide_id).await {
        Ok(_) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
