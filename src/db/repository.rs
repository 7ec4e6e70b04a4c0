//! Database repository for presentation documents.
//!
//! Slide-level authoring operations are load → apply model op → conditional
//! persist; racing writers surface as version conflicts.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    AddFragmentRequest, CreatePresentationRequest, Fragment, Library, MoveDirection, Presentation,
    PresentationStatus, PresentationSummary, RevisionInfo, Slide, SlideKind,
    UpdateFragmentRequest, UpdatePresentationRequest, UpdateSlideRequest, VoiceOver,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full library dump.
    pub async fn get_library(&self) -> Result<Library, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            "SELECT id, title, description, slides, config, status, slide_count, created_at, updated_at, version FROM presentations ORDER BY updated_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        let presentations = rows
            .iter()
            .map(presentation_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Library {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            presentations,
        })
    }

    // ==================== PRESENTATION OPERATIONS ====================

    /// List all presentations as summaries, most recently edited first.
    pub async fn list_presentations(&self) -> Result<Vec<PresentationSummary>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, status, slide_count, updated_at, version FROM presentations ORDER BY updated_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// Get a presentation summary by ID without parsing the document.
    pub async fn get_summary(&self, id: &str) -> Result<Option<PresentationSummary>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, description, status, slide_count, updated_at, version FROM presentations WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(summary_from_row))
    }

    /// Get a full presentation document by ID.
    pub async fn get_presentation(&self, id: &str) -> Result<Option<Presentation>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, description, slides, config, status, slide_count, created_at, updated_at, version FROM presentations WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(presentation_from_row).transpose()
    }

    /// Create a new presentation with a single default title slide.
    pub async fn create_presentation(
        &self,
        request: &CreatePresentationRequest,
    ) -> Result<Presentation, AppError> {
        let presentation = Presentation::new(
            &request.title,
            request.description.clone(),
            request.config.clone().unwrap_or_default(),
        );

        let slides_json = to_json(&presentation.slides)?;
        let config_json = to_json(&presentation.config)?;

        sqlx::query(
            "INSERT INTO presentations (id, title, description, slides, config, status, slide_count, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&presentation.id)
        .bind(&presentation.title)
        .bind(&presentation.description)
        .bind(&slides_json)
        .bind(&config_json)
        .bind(presentation.status.as_str())
        .bind(presentation.slide_count as i64)
        .bind(&presentation.created_at)
        .bind(&presentation.updated_at)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(presentation)
    }

    /// Update a presentation with optimistic concurrency control.
    pub async fn update_presentation(
        &self,
        id: &str,
        request: &UpdatePresentationRequest,
    ) -> Result<Presentation, AppError> {
        let mut existing = self.require_presentation(id).await?;

        // Check version for optimistic concurrency
        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        if let Some(title) = &request.title {
            existing.title = title.clone();
        }
        if let Some(description) = &request.description {
            existing.description = Some(description.clone());
        }
        if let Some(config) = &request.config {
            existing.config = config.clone();
        }
        if let Some(status) = request.status {
            existing.status = status;
        }
        if let Some(slides) = &request.slides {
            if slides.is_empty() {
                return Err(AppError::Validation(
                    "A presentation must keep at least one slide".to_string(),
                ));
            }
            existing.slides = slides.clone();
        }

        existing.slide_count = existing.slides.len();
        existing.updated_at = Utc::now().to_rfc3339();

        self.persist(&mut existing).await?;
        Ok(existing)
    }

    /// Delete a presentation.
    pub async fn delete_presentation(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM presentations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Presentation {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== SLIDE OPERATIONS ====================

    /// Append a slide of the given type.
    pub async fn add_slide(
        &self,
        id: &str,
        kind: SlideKind,
    ) -> Result<(Presentation, Slide), AppError> {
        let mut presentation = self.require_presentation(id).await?;
        let slide = presentation.add_slide(kind);
        self.persist(&mut presentation).await?;
        Ok((presentation, slide))
    }

    /// Update a slide in place.
    pub async fn update_slide(
        &self,
        id: &str,
        slide_id: &str,
        request: &UpdateSlideRequest,
    ) -> Result<(Presentation, Slide), AppError> {
        let mut presentation = self.require_presentation(id).await?;
        let slide = presentation.update_slide(slide_id, request)?;
        self.persist(&mut presentation).await?;
        Ok((presentation, slide))
    }

    /// Duplicate a slide directly after its source.
    pub async fn duplicate_slide(
        &self,
        id: &str,
        slide_id: &str,
    ) -> Result<(Presentation, Slide), AppError> {
        let mut presentation = self.require_presentation(id).await?;
        let slide = presentation.duplicate_slide(slide_id)?;
        self.persist(&mut presentation).await?;
        Ok((presentation, slide))
    }

    /// Move a slide one position. Edge moves are no-ops and skip the write.
    pub async fn move_slide(
        &self,
        id: &str,
        slide_id: &str,
        direction: MoveDirection,
    ) -> Result<Presentation, AppError> {
        let mut presentation = self.require_presentation(id).await?;
        if presentation.move_slide(slide_id, direction)? {
            self.persist(&mut presentation).await?;
        }
        Ok(presentation)
    }

    /// Delete a slide, keeping the at-least-one invariant.
    pub async fn delete_slide(&self, id: &str, slide_id: &str) -> Result<Presentation, AppError> {
        let mut presentation = self.require_presentation(id).await?;
        presentation.remove_slide(slide_id)?;
        self.persist(&mut presentation).await?;
        Ok(presentation)
    }

    // ==================== FRAGMENT OPERATIONS ====================

    /// Append a fragment to a slide.
    pub async fn add_fragment(
        &self,
        id: &str,
        slide_id: &str,
        request: &AddFragmentRequest,
    ) -> Result<(Presentation, Fragment), AppError> {
        let mut presentation = self.require_presentation(id).await?;
        let fragment =
            presentation.add_fragment(slide_id, request.content.clone(), request.animation)?;
        self.persist(&mut presentation).await?;
        Ok((presentation, fragment))
    }

    /// Edit a fragment.
    pub async fn update_fragment(
        &self,
        id: &str,
        slide_id: &str,
        fragment_id: &str,
        request: &UpdateFragmentRequest,
    ) -> Result<(Presentation, Fragment), AppError> {
        let mut presentation = self.require_presentation(id).await?;
        let fragment = presentation.update_fragment(
            slide_id,
            fragment_id,
            request.content.clone(),
            request.animation,
        )?;
        self.persist(&mut presentation).await?;
        Ok((presentation, fragment))
    }

    /// Remove a fragment.
    pub async fn delete_fragment(
        &self,
        id: &str,
        slide_id: &str,
        fragment_id: &str,
    ) -> Result<Presentation, AppError> {
        let mut presentation = self.require_presentation(id).await?;
        presentation.remove_fragment(slide_id, fragment_id)?;
        self.persist(&mut presentation).await?;
        Ok(presentation)
    }

    // ==================== VOICE-OVER OPERATIONS ====================

    /// Attach or replace a slide's voice-over.
    pub async fn set_voice_over(
        &self,
        id: &str,
        slide_id: &str,
        voice_over: VoiceOver,
    ) -> Result<(Presentation, Slide), AppError> {
        let mut presentation = self.require_presentation(id).await?;
        let slide = presentation.set_voice_over(slide_id, voice_over)?;
        self.persist(&mut presentation).await?;
        Ok((presentation, slide))
    }

    /// Remove a slide's voice-over.
    pub async fn clear_voice_over(
        &self,
        id: &str,
        slide_id: &str,
    ) -> Result<Presentation, AppError> {
        let mut presentation = self.require_presentation(id).await?;
        presentation.clear_voice_over(slide_id)?;
        self.persist(&mut presentation).await?;
        Ok(presentation)
    }

    // ==================== INTERNAL ====================

    async fn require_presentation(&self, id: &str) -> Result<Presentation, AppError> {
        self.get_presentation(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Presentation {} not found", id)))
    }

    /// Write back a mutated document with a conditional version bump.
    async fn persist(&self, presentation: &mut Presentation) -> Result<(), AppError> {
        let expected = presentation.version;
        presentation.version = expected + 1;
        presentation.slide_count = presentation.slides.len();

        let slides_json = to_json(&presentation.slides)?;
        let config_json = to_json(&presentation.config)?;

        let result = sqlx::query(
            r#"UPDATE presentations SET
                title = ?, description = ?, slides = ?, config = ?, status = ?,
                slide_count = ?, updated_at = ?, version = ?
            WHERE id = ? AND version = ?"#,
        )
        .bind(&presentation.title)
        .bind(&presentation.description)
        .bind(&slides_json)
        .bind(&config_json)
        .bind(presentation.status.as_str())
        .bind(presentation.slide_count as i64)
        .bind(&presentation.updated_at)
        .bind(presentation.version)
        .bind(&presentation.id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Race condition - version changed between read and write
            let current = self.get_summary(&presentation.id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|p| p.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;
        Ok(())
    }
}

// Helper functions for row conversion

fn summary_from_row(row: &sqlx::sqlite::SqliteRow) -> PresentationSummary {
    let status_str: String = row.get("status");
    let slide_count: i64 = row.get("slide_count");
    PresentationSummary {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        status: PresentationStatus::from_str(&status_str).unwrap_or_default(),
        slide_count: slide_count as usize,
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn presentation_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Presentation, AppError> {
    let slides_json: String = row.get("slides");
    let config_json: String = row.get("config");
    let status_str: String = row.get("status");

    let slides: Vec<Slide> = serde_json::from_str(&slides_json)
        .map_err(|e| AppError::Database(format!("Corrupt slides column: {}", e)))?;
    let config = serde_json::from_str(&config_json).unwrap_or_default();

    let mut presentation = Presentation {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        slides,
        config,
        status: PresentationStatus::from_str(&status_str).unwrap_or_default(),
        slide_count: 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    };
    // The count is derived; never trust the stored column for the document.
    presentation.slide_count = presentation.slides.len();
    Ok(presentation)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize document: {}", e)))
}
