//! Severity/category classification configuration.
//!
//! The keyword sets are deliberately configurable: the classification
//! *shape* (deterministic mapping from message/context to severity and
//! category) is fixed, the concrete word lists are deployment policy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Substrings of the message (or error kind names in context) that
    /// escalate severity to High.
    pub high_markers: Vec<String>,
    /// Context `type` values classified as Medium severity.
    pub medium_context_types: Vec<String>,
    pub network_keywords: Vec<String>,
    pub rendering_keywords: Vec<String>,
    pub memory_keywords: Vec<String>,
    pub audio_keywords: Vec<String>,
    pub storage_keywords: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            high_markers: vec!["type error".into(), "reference error".into()],
            medium_context_types: vec!["unhandled_rejection".into()],
            network_keywords: vec!["network".into(), "fetch".into(), "timeout".into()],
            rendering_keywords: vec!["canvas".into(), "render".into(), "shader".into()],
            memory_keywords: vec!["memory".into(), "allocation".into(), "heap".into()],
            audio_keywords: vec!["audio".into(), "sound".into()],
            storage_keywords: vec!["storage".into(), "quota".into()],
        }
    }
}
