//! Slide model matching the frontend builder's slide shape.
//!
//! A slide is a discriminated record: the `type` tag selects which `content`
//! shape is valid. The enum encoding makes a mismatched content body a
//! deserialization error instead of silently accepted JSON.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::VoiceOver;

/// Discriminant for the supported slide types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    Content,
    Code,
    Image,
    Video,
    Chart,
    Math,
    Mermaid,
    Quiz,
}

impl SlideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideKind::Title => "title",
            SlideKind::Content => "content",
            SlideKind::Code => "code",
            SlideKind::Image => "image",
            SlideKind::Video => "video",
            SlideKind::Chart => "chart",
            SlideKind::Math => "math",
            SlideKind::Mermaid => "mermaid",
            SlideKind::Quiz => "quiz",
        }
    }
}

/// Content payload for a title slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleContent {
    pub title: String,
    pub subtitle: String,
}

impl Default for TitleContent {
    fn default() -> Self {
        Self {
            title: "Title Slide".to_string(),
            subtitle: String::new(),
        }
    }
}

/// Content payload for a rich-text content slide. `body` is an HTML string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    pub title: String,
    pub body: String,
}

/// Content payload for a code slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeContent {
    pub title: String,
    pub code: String,
    pub language: String,
}

impl Default for CodeContent {
    fn default() -> Self {
        Self {
            title: String::new(),
            code: String::new(),
            language: "javascript".to_string(),
        }
    }
}

/// Content payload for an image slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageContent {
    pub title: String,
    pub url: String,
    pub caption: String,
}

/// Content payload for a video slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    pub title: String,
    pub url: String,
    pub autoplay: bool,
}

/// Content payload for a chart slide. `data` is the chart library's dataset
/// object, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartContent {
    pub title: String,
    pub chart_type: String,
    pub data: serde_json::Value,
}

impl Default for ChartContent {
    fn default() -> Self {
        Self {
            title: String::new(),
            chart_type: "bar".to_string(),
            data: json!({ "labels": [], "datasets": [] }),
        }
    }
}

/// Content payload for a math slide. `formula` is LaTeX source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MathContent {
    pub title: String,
    pub formula: String,
}

/// Content payload for a mermaid diagram slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MermaidContent {
    pub title: String,
    pub diagram: String,
}

impl Default for MermaidContent {
    fn default() -> Self {
        Self {
            title: String::new(),
            diagram: "graph TD\n  A --> B".to_string(),
        }
    }
}

/// Content payload for a quiz slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizContent {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: String,
}

impl Default for QuizContent {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); 4],
            correct_option: 0,
            explanation: String::new(),
        }
    }
}

/// Type-discriminated slide content. Serializes as sibling `type` and
/// `content` keys on the slide object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum SlideContent {
    Title(TitleContent),
    Content(TextContent),
    Code(CodeContent),
    Image(ImageContent),
    Video(VideoContent),
    Chart(ChartContent),
    Math(MathContent),
    Mermaid(MermaidContent),
    Quiz(QuizContent),
}

impl SlideContent {
    /// The documented default content shape for a slide type.
    pub fn default_for(kind: SlideKind) -> Self {
        match kind {
            SlideKind::Title => SlideContent::Title(TitleContent::default()),
            SlideKind::Content => SlideContent::Content(TextContent::default()),
            SlideKind::Code => SlideContent::Code(CodeContent::default()),
            SlideKind::Image => SlideContent::Image(ImageContent::default()),
            SlideKind::Video => SlideContent::Video(VideoContent::default()),
            SlideKind::Chart => SlideContent::Chart(ChartContent::default()),
            SlideKind::Math => SlideContent::Math(MathContent::default()),
            SlideKind::Mermaid => SlideContent::Mermaid(MermaidContent::default()),
            SlideKind::Quiz => SlideContent::Quiz(QuizContent::default()),
        }
    }

    pub fn kind(&self) -> SlideKind {
        match self {
            SlideContent::Title(_) => SlideKind::Title,
            SlideContent::Content(_) => SlideKind::Content,
            SlideContent::Code(_) => SlideKind::Code,
            SlideContent::Image(_) => SlideKind::Image,
            SlideContent::Video(_) => SlideKind::Video,
            SlideContent::Chart(_) => SlideKind::Chart,
            SlideContent::Math(_) => SlideKind::Math,
            SlideContent::Mermaid(_) => SlideKind::Mermaid,
            SlideContent::Quiz(_) => SlideKind::Quiz,
        }
    }

    /// Parse a raw content record against a declared slide type.
    pub fn from_parts(kind: SlideKind, content: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json!({ "type": kind.as_str(), "content": content }))
    }

    /// Human-readable text used by the search index.
    pub fn text_for_index(&self) -> String {
        match self {
            SlideContent::Title(c) => format!("{} {}", c.title, c.subtitle),
            SlideContent::Content(c) => format!("{} {}", c.title, c.body),
            SlideContent::Code(c) => format!("{} {} {}", c.title, c.language, c.code),
            SlideContent::Image(c) => format!("{} {}", c.title, c.caption),
            SlideContent::Video(c) => c.title.clone(),
            SlideContent::Chart(c) => format!("{} {}", c.title, c.chart_type),
            SlideContent::Math(c) => format!("{} {}", c.title, c.formula),
            SlideContent::Mermaid(c) => c.title.clone(),
            SlideContent::Quiz(c) => format!(
                "{} {} {}",
                c.question,
                c.options.join(" "),
                c.explanation
            ),
        }
    }
}

/// Background kind for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Gradient,
    Image,
    Video,
}

/// Slide background: a kind plus its value (hex color, CSS gradient, or URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub kind: BackgroundKind,
    pub value: String,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: "#191919".to_string(),
        }
    }
}

/// Slide transition names understood by the rendering library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    None,
    Fade,
    #[default]
    Slide,
    Convex,
    Concave,
    Zoom,
}

/// Fragment reveal animations, a fixed enumerated set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentAnimation {
    #[default]
    FadeIn,
    FadeUp,
    FadeDown,
    FadeLeft,
    FadeRight,
    Grow,
    Shrink,
    Strike,
    HighlightRed,
    HighlightBlue,
}

/// An incrementally-revealed content block within a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub id: String,
    /// Rich text/HTML string.
    pub content: String,
    #[serde(default)]
    pub animation: FragmentAnimation,
}

impl Fragment {
    pub fn new(content: String, animation: FragmentAnimation) -> Self {
        Self {
            id: timestamp_id(),
            content,
            animation,
        }
    }
}

/// One unit of visual content within a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    #[serde(flatten)]
    pub content: SlideContent,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub transition: Transition,
    #[serde(default)]
    pub fragments: Vec<Fragment>,
    /// Declared by the frontend for vertical stacks; carried through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertical_slides: Vec<Slide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_over: Option<VoiceOver>,
}

impl Slide {
    /// Create a slide of the given type with its default content.
    pub fn new(kind: SlideKind) -> Self {
        Self {
            id: timestamp_id(),
            content: SlideContent::default_for(kind),
            background: Background::default(),
            transition: Transition::default(),
            fragments: Vec::new(),
            vertical_slides: Vec::new(),
            voice_over: None,
        }
    }

    /// Deep copy with a fresh identifier.
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = timestamp_id();
        copy
    }
}

/// Time-based identifier matching the frontend's scheme, with a random
/// suffix so same-millisecond ids stay distinct.
pub fn timestamp_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// Request body for adding a slide to a presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSlideRequest {
    pub slide_type: SlideKind,
}

/// Request body for updating a slide in place.
///
/// `content` is a raw record validated against the slide's type (or against
/// `slideType` when a type switch is requested). A `slideType` change without
/// `content` resets the content to the new type's default shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlideRequest {
    #[serde(default)]
    pub slide_type: Option<SlideKind>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub transition: Option<Transition>,
}

/// Direction for adjacent slide reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Request body for moving a slide one position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlideRequest {
    pub direction: MoveDirection,
}

/// Request body for appending a fragment to a slide.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFragmentRequest {
    pub content: String,
    #[serde(default)]
    pub animation: FragmentAnimation,
}

/// Request body for editing a fragment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFragmentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub animation: Option<FragmentAnimation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_serializes_with_type_and_content_keys() {
        let slide = Slide::new(SlideKind::Code);
        let value = serde_json::to_value(&slide).unwrap();

        assert_eq!(value["type"], "code");
        assert_eq!(value["content"]["language"], "javascript");
        assert!(value["content"]["code"].is_string());
        assert_eq!(value["background"]["kind"], "color");
        assert_eq!(value["transition"], "slide");
        // Empty vertical stack and absent voice-over are omitted from the wire.
        assert!(value.get("verticalSlides").is_none());
        assert!(value.get("voiceOver").is_none());
    }

    #[test]
    fn slide_deserializes_from_frontend_shape() {
        let json = serde_json::json!({
            "id": "1700000000000-abc12345",
            "type": "quiz",
            "content": {
                "question": "What is ownership?",
                "options": ["a", "b", "c"],
                "correctOption": 1,
                "explanation": "See chapter 4."
            },
            "background": { "kind": "gradient", "value": "linear-gradient(#000, #333)" },
            "transition": "fade",
            "fragments": [
                { "id": "f1", "content": "<p>hint</p>", "animation": "fade-up" }
            ]
        });

        let slide: Slide = serde_json::from_value(json).unwrap();
        assert_eq!(slide.content.kind(), SlideKind::Quiz);
        match &slide.content {
            SlideContent::Quiz(quiz) => {
                assert_eq!(quiz.correct_option, 1);
                assert_eq!(quiz.options.len(), 3);
            }
            other => panic!("unexpected content: {:?}", other),
        }
        assert_eq!(slide.transition, Transition::Fade);
        assert_eq!(slide.fragments[0].animation, FragmentAnimation::FadeUp);
    }

    #[test]
    fn content_must_match_declared_type() {
        let result = SlideContent::from_parts(
            SlideKind::Quiz,
            serde_json::json!({ "question": "ok", "options": "not-an-array" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn partial_content_fills_in_defaults() {
        let content =
            SlideContent::from_parts(SlideKind::Code, serde_json::json!({ "code": "fn main() {}" }))
                .unwrap();
        match content {
            SlideContent::Code(code) => {
                assert_eq!(code.code, "fn main() {}");
                assert_eq!(code.language, "javascript");
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn unknown_slide_type_is_rejected() {
        let result: Result<Slide, _> = serde_json::from_value(serde_json::json!({
            "id": "x",
            "type": "hologram",
            "content": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn timestamp_ids_are_distinct() {
        let a = timestamp_id();
        let b = timestamp_id();
        assert_ne!(a, b);
    }
}
