//! Voice-over model: optional narration attached to a slide.
//!
//! Exactly one mode is active at a time. The tagged-enum encoding makes that
//! structural: replacing a voice-over discards the other modes' fields, which
//! resolves the mode-switching ambiguity the original builder left open.

use serde::{Deserialize, Serialize};

/// Narration attached to a slide, discriminated by `mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum VoiceOver {
    /// Synthesized speech. The client drives the speech-synthesis API from
    /// these parameters.
    #[serde(rename_all = "camelCase")]
    Tts {
        text: String,
        voice: String,
        #[serde(default = "default_unit")]
        rate: f32,
        #[serde(default = "default_unit")]
        pitch: f32,
        #[serde(default = "default_unit")]
        volume: f32,
    },
    /// Uploaded audio file. `audio_url` is whatever locator the client uses;
    /// the server stores it opaquely.
    #[serde(rename_all = "camelCase")]
    Upload {
        audio_url: String,
        #[serde(default)]
        autoplay: bool,
    },
    /// Microphone recording captured client side.
    #[serde(rename_all = "camelCase")]
    Record {
        audio_url: String,
        #[serde(default)]
        autoplay: bool,
    },
}

fn default_unit() -> f32 {
    1.0
}
