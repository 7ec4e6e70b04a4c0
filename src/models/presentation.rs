//! Presentation model matching the frontend builder's document shape, plus
//! the in-memory authoring operations the builder performs on it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

use super::{
    Fragment, FragmentAnimation, MoveDirection, Slide, SlideContent, SlideKind, TitleContent,
    Transition, UpdateSlideRequest, VoiceOver,
};

/// Publication status of a presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationStatus {
    #[default]
    Draft,
    Published,
}

impl PresentationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationStatus::Draft => "draft",
            PresentationStatus::Published => "published",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PresentationStatus::Draft),
            "published" => Some(PresentationStatus::Published),
            _ => None,
        }
    }
}

/// Per-feature plugin enable map consumed by the rendering library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginFlags {
    pub highlight: bool,
    pub math: bool,
    pub chart: bool,
    pub mermaid: bool,
    pub notes: bool,
}

impl Default for PluginFlags {
    fn default() -> Self {
        Self {
            highlight: true,
            math: false,
            chart: false,
            mermaid: false,
            notes: true,
        }
    }
}

/// Presentation-wide rendering/behavior flags. Pure value object; defaults
/// are applied for any field absent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresentationConfig {
    pub width: u32,
    pub height: u32,
    pub margin: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub controls: bool,
    pub progress: bool,
    pub slide_number: bool,
    #[serde(rename = "loop")]
    pub loop_presentation: bool,
    pub keyboard: bool,
    pub overview: bool,
    pub touch: bool,
    pub center: bool,
    pub transition: Transition,
    pub theme: String,
    pub plugins: PluginFlags,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 700,
            margin: 0.04,
            min_scale: 0.2,
            max_scale: 2.0,
            controls: true,
            progress: true,
            slide_number: false,
            loop_presentation: false,
            keyboard: true,
            overview: true,
            touch: true,
            center: true,
            transition: Transition::Slide,
            theme: "black".to_string(),
            plugins: PluginFlags::default(),
        }
    }
}

/// The top-level authored document: an ordered slide sequence plus
/// presentation-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub config: PresentationConfig,
    #[serde(default)]
    pub status: PresentationStatus,
    /// Derived; recomputed on every mutation.
    #[serde(default)]
    pub slide_count: usize,
    pub created_at: String,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

impl Presentation {
    /// Create a presentation with a single default title slide carrying the
    /// presentation title.
    pub fn new(title: &str, description: Option<String>, config: PresentationConfig) -> Self {
        let now = Utc::now().to_rfc3339();
        let mut first = Slide::new(SlideKind::Title);
        first.content = SlideContent::Title(TitleContent {
            title: title.to_string(),
            subtitle: String::new(),
        });

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description,
            slides: vec![first],
            config,
            status: PresentationStatus::Draft,
            slide_count: 1,
            created_at: now.clone(),
            updated_at: now,
            version: 1,
        }
    }

    /// Reduce to the listing shape.
    pub fn summary(&self) -> PresentationSummary {
        PresentationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            slide_count: self.slides.len(),
            updated_at: self.updated_at.clone(),
            version: self.version,
        }
    }

    fn slide_index(&self, slide_id: &str) -> Result<usize, AppError> {
        self.slides
            .iter()
            .position(|s| s.id == slide_id)
            .ok_or_else(|| AppError::NotFound(format!("Slide {} not found", slide_id)))
    }

    fn slide_mut(&mut self, slide_id: &str) -> Result<&mut Slide, AppError> {
        let index = self.slide_index(slide_id)?;
        Ok(&mut self.slides[index])
    }

    /// Resync derived fields after a mutation.
    fn touch(&mut self) {
        self.slide_count = self.slides.len();
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Append a slide of the given type with its default content.
    pub fn add_slide(&mut self, kind: SlideKind) -> Slide {
        let slide = Slide::new(kind);
        self.slides.push(slide.clone());
        self.touch();
        slide
    }

    /// Duplicate a slide: fresh id, inserted immediately after the source.
    pub fn duplicate_slide(&mut self, slide_id: &str) -> Result<Slide, AppError> {
        let index = self.slide_index(slide_id)?;
        let copy = self.slides[index].duplicated();
        self.slides.insert(index + 1, copy.clone());
        self.touch();
        Ok(copy)
    }

    /// Swap a slide with its neighbor. Moving up at index 0 or down at the
    /// last index is a no-op; returns whether anything moved.
    pub fn move_slide(
        &mut self,
        slide_id: &str,
        direction: MoveDirection,
    ) -> Result<bool, AppError> {
        let index = self.slide_index(slide_id)?;
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.slides.len() => index + 1,
            _ => return Ok(false),
        };
        self.slides.swap(index, target);
        self.touch();
        Ok(true)
    }

    /// Delete a slide. Rejected when it would leave the presentation empty.
    pub fn remove_slide(&mut self, slide_id: &str) -> Result<(), AppError> {
        let index = self.slide_index(slide_id)?;
        if self.slides.len() == 1 {
            return Err(AppError::Validation(
                "A presentation must keep at least one slide".to_string(),
            ));
        }
        self.slides.remove(index);
        self.touch();
        Ok(())
    }

    /// Apply an in-place slide edit. A type switch without an explicit
    /// content body resets the content to the new type's default shape;
    /// background, transition, fragments and voice-over survive the switch.
    pub fn update_slide(
        &mut self,
        slide_id: &str,
        request: &UpdateSlideRequest,
    ) -> Result<Slide, AppError> {
        let slide = self.slide_mut(slide_id)?;
        let target_kind = request.slide_type.unwrap_or_else(|| slide.content.kind());

        if let Some(content) = &request.content {
            slide.content =
                SlideContent::from_parts(target_kind, content.clone()).map_err(|e| {
                    AppError::Validation(format!(
                        "Content does not match slide type {}: {}",
                        target_kind.as_str(),
                        e
                    ))
                })?;
        } else if target_kind != slide.content.kind() {
            slide.content = SlideContent::default_for(target_kind);
        }

        if let Some(background) = &request.background {
            slide.background = background.clone();
        }
        if let Some(transition) = request.transition {
            slide.transition = transition;
        }

        let updated = slide.clone();
        self.touch();
        Ok(updated)
    }

    /// Append a fragment to a slide.
    pub fn add_fragment(
        &mut self,
        slide_id: &str,
        content: String,
        animation: FragmentAnimation,
    ) -> Result<Fragment, AppError> {
        let slide = self.slide_mut(slide_id)?;
        let fragment = Fragment::new(content, animation);
        slide.fragments.push(fragment.clone());
        self.touch();
        Ok(fragment)
    }

    /// Edit a fragment independently of the slide's own fields.
    pub fn update_fragment(
        &mut self,
        slide_id: &str,
        fragment_id: &str,
        content: Option<String>,
        animation: Option<FragmentAnimation>,
    ) -> Result<Fragment, AppError> {
        let slide = self.slide_mut(slide_id)?;
        let fragment = slide
            .fragments
            .iter_mut()
            .find(|f| f.id == fragment_id)
            .ok_or_else(|| AppError::NotFound(format!("Fragment {} not found", fragment_id)))?;

        if let Some(content) = content {
            fragment.content = content;
        }
        if let Some(animation) = animation {
            fragment.animation = animation;
        }

        let updated = fragment.clone();
        self.touch();
        Ok(updated)
    }

    /// Remove a fragment from a slide.
    pub fn remove_fragment(&mut self, slide_id: &str, fragment_id: &str) -> Result<(), AppError> {
        let slide = self.slide_mut(slide_id)?;
        let before = slide.fragments.len();
        slide.fragments.retain(|f| f.id != fragment_id);
        if slide.fragments.len() == before {
            return Err(AppError::NotFound(format!(
                "Fragment {} not found",
                fragment_id
            )));
        }
        self.touch();
        Ok(())
    }

    /// Attach or replace a slide's voice-over. Replacement discards the
    /// previous mode's data entirely.
    pub fn set_voice_over(
        &mut self,
        slide_id: &str,
        voice_over: VoiceOver,
    ) -> Result<Slide, AppError> {
        let slide = self.slide_mut(slide_id)?;
        slide.voice_over = Some(voice_over);
        let updated = slide.clone();
        self.touch();
        Ok(updated)
    }

    /// Remove a slide's voice-over. Idempotent.
    pub fn clear_voice_over(&mut self, slide_id: &str) -> Result<(), AppError> {
        let slide = self.slide_mut(slide_id)?;
        slide.voice_over = None;
        self.touch();
        Ok(())
    }
}

/// Listing shape for dashboards: document metadata without the slide payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: PresentationStatus,
    pub slide_count: usize,
    pub updated_at: String,
    pub version: i64,
}

/// Request body for creating a new presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresentationRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<PresentationConfig>,
}

/// Request body for updating an existing presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePresentationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<PresentationConfig>,
    #[serde(default)]
    pub status: Option<PresentationStatus>,
    /// Full slide-sequence replacement, as saved by the builder.
    #[serde(default)]
    pub slides: Option<Vec<Slide>>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Presentation {
        Presentation::new("Intro to Rust", None, PresentationConfig::default())
    }

    #[test]
    fn new_presentation_has_single_title_slide() {
        let p = deck();
        assert_eq!(p.slides.len(), 1);
        assert_eq!(p.slide_count, 1);
        assert_eq!(p.status, PresentationStatus::Draft);
        match &p.slides[0].content {
            SlideContent::Title(title) => assert_eq!(title.title, "Intro to Rust"),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn slide_count_tracks_every_mutation() {
        let mut p = deck();
        let added = p.add_slide(SlideKind::Content);
        assert_eq!(p.slide_count, 2);

        let copy = p.duplicate_slide(&added.id).unwrap();
        assert_eq!(p.slide_count, 3);

        p.remove_slide(&copy.id).unwrap();
        assert_eq!(p.slide_count, 2);
        assert_eq!(p.slide_count, p.slides.len());
    }

    #[test]
    fn duplicate_gets_fresh_id_directly_after_source() {
        let mut p = deck();
        let source = p.add_slide(SlideKind::Code);
        let copy = p.duplicate_slide(&source.id).unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.content, source.content);
        assert_eq!(p.slides[1].id, source.id);
        assert_eq!(p.slides[2].id, copy.id);
    }

    #[test]
    fn add_duplicate_move_up_scenario() {
        // From [title]: add content, duplicate it, move the duplicate up
        // => [title, duplicate, content].
        let mut p = deck();
        let content = p.add_slide(SlideKind::Content);
        let copy = p.duplicate_slide(&content.id).unwrap();

        let moved = p.move_slide(&copy.id, MoveDirection::Up).unwrap();
        assert!(moved);

        assert_eq!(p.slides.len(), 3);
        assert_eq!(p.slides[0].content.kind(), SlideKind::Title);
        assert_eq!(p.slides[1].id, copy.id);
        assert_eq!(p.slides[2].id, content.id);
    }

    #[test]
    fn move_at_edges_is_noop() {
        let mut p = deck();
        let last = p.add_slide(SlideKind::Image);
        let first_id = p.slides[0].id.clone();

        assert!(!p.move_slide(&first_id, MoveDirection::Up).unwrap());
        assert!(!p.move_slide(&last.id, MoveDirection::Down).unwrap());
        assert_eq!(p.slides[0].id, first_id);
        assert_eq!(p.slides[1].id, last.id);
    }

    #[test]
    fn last_slide_cannot_be_removed() {
        let mut p = deck();
        let only_id = p.slides[0].id.clone();
        let err = p.remove_slide(&only_id).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(p.slide_count, 1);
    }

    #[test]
    fn type_switch_resets_content_to_default() {
        let mut p = deck();
        let slide = p.add_slide(SlideKind::Content);
        p.update_slide(
            &slide.id,
            &UpdateSlideRequest {
                slide_type: None,
                content: Some(serde_json::json!({ "title": "Edited", "body": "<p>x</p>" })),
                background: None,
                transition: None,
            },
        )
        .unwrap();

        let updated = p
            .update_slide(
                &slide.id,
                &UpdateSlideRequest {
                    slide_type: Some(SlideKind::Math),
                    content: None,
                    background: None,
                    transition: None,
                },
            )
            .unwrap();

        assert_eq!(
            updated.content,
            SlideContent::default_for(SlideKind::Math)
        );
    }

    #[test]
    fn type_switch_keeps_background_and_fragments() {
        let mut p = deck();
        let slide = p.add_slide(SlideKind::Content);
        p.add_fragment(&slide.id, "<p>one</p>".to_string(), FragmentAnimation::Grow)
            .unwrap();

        let updated = p
            .update_slide(
                &slide.id,
                &UpdateSlideRequest {
                    slide_type: Some(SlideKind::Code),
                    content: None,
                    background: None,
                    transition: None,
                },
            )
            .unwrap();

        assert_eq!(updated.fragments.len(), 1);
        assert_eq!(updated.background, slide.background);
    }

    #[test]
    fn mismatched_content_is_rejected() {
        let mut p = deck();
        let slide = p.add_slide(SlideKind::Quiz);
        let err = p
            .update_slide(
                &slide.id,
                &UpdateSlideRequest {
                    slide_type: None,
                    content: Some(serde_json::json!({ "options": 7 })),
                    background: None,
                    transition: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn fragment_lifecycle() {
        let mut p = deck();
        let slide_id = p.slides[0].id.clone();

        let fragment = p
            .add_fragment(&slide_id, "<p>reveal</p>".to_string(), FragmentAnimation::FadeIn)
            .unwrap();
        let edited = p
            .update_fragment(
                &slide_id,
                &fragment.id,
                None,
                Some(FragmentAnimation::HighlightRed),
            )
            .unwrap();
        assert_eq!(edited.content, "<p>reveal</p>");
        assert_eq!(edited.animation, FragmentAnimation::HighlightRed);

        p.remove_fragment(&slide_id, &fragment.id).unwrap();
        assert!(p.slides[0].fragments.is_empty());

        let err = p.remove_fragment(&slide_id, &fragment.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn voice_over_replacement_switches_mode_cleanly() {
        let mut p = deck();
        let slide_id = p.slides[0].id.clone();

        p.set_voice_over(
            &slide_id,
            VoiceOver::Tts {
                text: "Hello".to_string(),
                voice: "en-US".to_string(),
                rate: 1.0,
                pitch: 1.0,
                volume: 1.0,
            },
        )
        .unwrap();

        let updated = p
            .set_voice_over(
                &slide_id,
                VoiceOver::Record {
                    audio_url: "blob:xyz".to_string(),
                    autoplay: true,
                },
            )
            .unwrap();

        match updated.voice_over {
            Some(VoiceOver::Record { ref audio_url, autoplay }) => {
                assert_eq!(audio_url, "blob:xyz");
                assert!(autoplay);
            }
            other => panic!("unexpected voice-over: {:?}", other),
        }

        p.clear_voice_over(&slide_id).unwrap();
        assert!(p.slides[0].voice_over.is_none());
    }

    #[test]
    fn config_defaults_apply_for_absent_fields() {
        let config: PresentationConfig =
            serde_json::from_value(serde_json::json!({ "theme": "league", "loop": true })).unwrap();
        assert_eq!(config.theme, "league");
        assert!(config.loop_presentation);
        assert_eq!(config.width, 960);
        assert_eq!(config.height, 700);
        assert!(config.plugins.highlight);
        assert!(!config.plugins.mermaid);
    }
}
