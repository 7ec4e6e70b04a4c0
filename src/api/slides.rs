//! Slide authoring API endpoints.
//!
//! These implement the builder's per-slide operations server side so the
//! document invariants (slide count, at-least-one slide, adjacent-only
//! reordering) hold no matter which client calls them.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::models::{
    AddSlideRequest, MoveSlideRequest, Presentation, Slide, UpdateSlideRequest,
};
use crate::AppState;

/// POST /api/presentations/:id/slides - Append a slide of the requested type.
pub async fn add_slide(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddSlideRequest>,
) -> ApiResult<Slide> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.add_slide(&id, request.slide_type).await {
        Ok((presentation, slide)) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(slide, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/presentations/:id/slides/:slide_id - Update a slide in place.
pub async fn update_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
    Json(request): Json<UpdateSlideRequest>,
) -> ApiResult<Slide> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_slide(&id, &slide_id, &request).await {
        Ok((presentation, slide)) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(slide, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/presentations/:id/slides/:slide_id/duplicate - Duplicate a slide.
pub async fn duplicate_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
) -> ApiResult<Slide> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.duplicate_slide(&id, &slide_id).await {
        Ok((presentation, slide)) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(slide, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/presentations/:id/slides/:slide_id/move - Move a slide one
/// position. Edge moves are no-ops and return the unchanged document.
pub async fn move_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
    Json(request): Json<MoveSlideRequest>,
) -> ApiResult<Presentation> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.move_slide(&id, &slide_id, request.direction).await {
        Ok(presentation) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(presentation, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/presentations/:id/slides/:slide_id - Delete a slide.
pub async fn delete_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
) -> ApiResult<Presentation> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_slide(&id, &slide_id).await {
        Ok(presentation) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(presentation, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// Re-index a presentation after a content-affecting mutation.
pub(super) async fn reindex(state: &AppState, presentation: &Presentation) {
    if let Err(e) = state.search.index_presentation(presentation).await {
        tracing::warn!(
            "Failed to re-index presentation {}: {}",
            presentation.id,
            e
        );
    }
}
