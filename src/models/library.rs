//! Library model: the full dump the frontend can hydrate from.

use serde::{Deserialize, Serialize};

use super::Presentation;

/// The root library containing every presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub presentations: Vec<Presentation>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
