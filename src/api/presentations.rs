//! Presentation API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreatePresentationRequest, Presentation, PresentationSummary, UpdatePresentationRequest,
};
use crate::AppState;

/// GET /api/presentations - List all presentations as summaries.
pub async fn list_presentations(
    State(state): State<AppState>,
) -> ApiResult<Vec<PresentationSummary>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_presentations().await {
        Ok(presentations) => success(presentations, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/presentations/:id - Get a full presentation document.
pub async fn get_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Presentation> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_presentation(&id).await {
        Ok(Some(presentation)) => success(presentation, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Presentation {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/presentations - Create a new presentation.
pub async fn create_presentation(
    State(state): State<AppState>,
    Json(request): Json<CreatePresentationRequest>,
) -> ApiResult<Presentation> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Validate required fields
    if request.title.trim().is_empty() {
        return error(
            AppError::Validation("Title is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_presentation(&request).await {
        Ok(presentation) => {
            // Index the new presentation
            if let Err(e) = state.search.index_presentation(&presentation).await {
                tracing::warn!("Failed to index presentation: {}", e);
            }

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(presentation, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/presentations/:id - Update a presentation.
pub async fn update_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePresentationRequest>,
) -> ApiResult<Presentation> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return error(
                AppError::Validation("Title must not be empty".to_string()),
                revision_id,
            );
        }
    }

    match state.repo.update_presentation(&id, &request).await {
        Ok(presentation) => {
            // Re-index the updated presentation
            if let Err(e) = state.search.index_presentation(&presentation).await {
                tracing::warn!("Failed to re-index presentation: {}", e);
            }

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(presentation, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/presentations/:id - Delete a presentation.
pub async fn delete_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_presentation(&id).await {
        Ok(()) => {
            // Remove from search index
            if let Err(e) = state.search.remove_presentation(&id).await {
                tracing::warn!("Failed to remove presentation from index: {}", e);
            }

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
