//! Data models for the slide presentation builder.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod library;
mod presentation;
mod slide;
mod voiceover;

pub use library::*;
pub use presentation::*;
pub use slide::*;
pub use voiceover::*;
