//! Severity and category classification from message/context heuristics.
//!
//! The mapping is deterministic; the keyword sets come from
//! `ClassifyConfig` so deployments can tune them without code changes.

use rustc_hash::FxHashMap;

use vigil_core::config::ClassifyConfig;
use vigil_core::models::{Category, Severity};

/// Severity rules, strongest last so later rules override earlier ones:
/// high markers → High, recognized context type → Medium, explicit
/// `critical` flag → Critical. A stopped runtime escalates one level.
pub fn classify_severity(
    message: &str,
    context: &FxHashMap<String, serde_json::Value>,
    cfg: &ClassifyConfig,
) -> Severity {
    let lowered = message.to_lowercase();
    let mut severity = Severity::Low;

    if cfg.high_markers.iter().any(|m| lowered.contains(m.as_str())) {
        severity = Severity::High;
    }

    if let Some(ctx_type) = context.get("type").and_then(|v| v.as_str()) {
        if cfg.medium_context_types.iter().any(|t| t == ctx_type) && severity < Severity::Medium {
            severity = Severity::Medium;
        }
    }

    if context
        .get("critical")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
    {
        severity = Severity::Critical;
    }

    // A stopped runtime makes any error one step more urgent.
    let runtime_stopped = context
        .get("game_state")
        .and_then(|v| v.get("running"))
        .and_then(|v| v.as_bool())
        == Some(false);
    if runtime_stopped {
        severity = severity.escalate();
    }

    severity
}

/// Category rules: a context `type` naming a known category wins,
/// otherwise the first keyword set matching the message decides,
/// otherwise General.
pub fn classify_category(
    message: &str,
    context: &FxHashMap<String, serde_json::Value>,
    cfg: &ClassifyConfig,
) -> Category {
    if let Some(ctx_type) = context.get("type").and_then(|v| v.as_str()) {
        if let Some(category) = Category::parse(ctx_type) {
            return category;
        }
    }

    let lowered = message.to_lowercase();
    let sets: [(&[String], Category); 5] = [
        (&cfg.network_keywords, Category::Network),
        (&cfg.rendering_keywords, Category::Rendering),
        (&cfg.memory_keywords, Category::Memory),
        (&cfg.audio_keywords, Category::Audio),
        (&cfg.storage_keywords, Category::Storage),
    ];
    for (keywords, category) in sets {
        if keywords.iter().any(|k| lowered.contains(k.as_str())) {
            return category;
        }
    }
    Category::General
}
