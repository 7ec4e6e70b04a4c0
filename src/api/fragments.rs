//! Fragment API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::slides::reindex;
use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{AddFragmentRequest, Fragment, Slide, UpdateFragmentRequest};
use crate::AppState;

/// POST /api/presentations/:id/slides/:slide_id/fragments - Append a fragment.
pub async fn add_fragment(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
    Json(request): Json<AddFragmentRequest>,
) -> ApiResult<Fragment> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.content.trim().is_empty() {
        return error(
            AppError::Validation("Fragment content is required".to_string()),
            revision_id,
        );
    }

    match state.repo.add_fragment(&id, &slide_id, &request).await {
        Ok((presentation, fragment)) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(fragment, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/presentations/:id/slides/:slide_id/fragments/:fragment_id - Edit a fragment.
pub async fn update_fragment(
    State(state): State<AppState>,
    Path((id, slide_id, fragment_id)): Path<(String, String, String)>,
    Json(request): Json<UpdateFragmentRequest>,
) -> ApiResult<Fragment> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .update_fragment(&id, &slide_id, &fragment_id, &request)
        .await
    {
        Ok((presentation, fragment)) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(fragment, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/presentations/:id/slides/:slide_id/fragments/:fragment_id - Remove a fragment.
pub async fn delete_fragment(
    State(state): State<AppState>,
    Path((id, slide_id, fragment_id)): Path<(String, String, String)>,
) -> ApiResult<Slide> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_fragment(&id, &slide_id, &fragment_id).await {
        Ok(presentation) => {
            reindex(&state, &presentation).await;
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            match presentation.slides.into_iter().find(|s| s.id == slide_id) {
                Some(slide) => success(slide, new_revision),
                None => error(
                    AppError::NotFound(format!("Slide {} not found", slide_id)),
                    new_revision,
                ),
            }
        }
        Err(e) => error(e, revision_id),
    }
}
