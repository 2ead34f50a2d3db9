//! Recovery strategies and their registry. Each strategy declares what
//! it can recover and how; built-ins delegate to the runtime hooks.

use tracing::debug;

use vigil_core::errors::RecoveryError;
use vigil_core::models::{Category, Fingerprint, Severity};
use vigil_core::traits::GameRuntime;

/// Everything a strategy may inspect when deciding on, or performing,
/// a recovery.
pub struct RecoveryContext<'a> {
    pub error_id: &'a str,
    pub message: &'a str,
    pub category: Category,
    pub severity: Severity,
    pub fingerprint: Fingerprint,
    pub runtime: &'a dyn GameRuntime,
}

pub trait RecoveryStrategy {
    fn name(&self) -> &str;

    /// Candidate ordering; lower runs first. Ties break on historical
    /// effectiveness.
    fn priority(&self) -> u32 {
        100
    }

    fn can_recover(&self, ctx: &RecoveryContext<'_>) -> bool;

    fn recover(&self, ctx: &RecoveryContext<'_>) -> Result<(), RecoveryError>;
}

fn message_has(message: &str, needles: &[&str]) -> bool {
    let lower = message.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Resets the rendering surface. Targets rendering errors and messages
/// naming the canvas or WebGL context.
pub struct CanvasReset;

impl RecoveryStrategy for CanvasReset {
    fn name(&self) -> &str {
        "canvas-reset"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn can_recover(&self, ctx: &RecoveryContext<'_>) -> bool {
        ctx.category == Category::Rendering
            || message_has(ctx.message, &["canvas", "webgl", "render"])
    }

    fn recover(&self, ctx: &RecoveryContext<'_>) -> Result<(), RecoveryError> {
        ctx.runtime.reset_surface()
    }
}

/// Clears runtime caches. Targets memory and storage pressure.
pub struct CacheClear;

impl RecoveryStrategy for CacheClear {
    fn name(&self) -> &str {
        "cache-clear"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn can_recover(&self, ctx: &RecoveryContext<'_>) -> bool {
        matches!(ctx.category, Category::Memory | Category::Storage)
            || message_has(ctx.message, &["cache", "memory", "quota"])
    }

    fn recover(&self, ctx: &RecoveryContext<'_>) -> Result<(), RecoveryError> {
        ctx.runtime.clear_cache()
    }
}

/// Reloads the current scene. Last resort for severe errors.
pub struct SceneReload;

impl RecoveryStrategy for SceneReload {
    fn name(&self) -> &str {
        "scene-reload"
    }

    fn priority(&self) -> u32 {
        30
    }

    fn can_recover(&self, ctx: &RecoveryContext<'_>) -> bool {
        ctx.severity >= Severity::High || message_has(ctx.message, &["scene"])
    }

    fn recover(&self, ctx: &RecoveryContext<'_>) -> Result<(), RecoveryError> {
        ctx.runtime.reload_scene()
    }
}

/// Name-keyed strategy registry. Registration rejects duplicates so a
/// custom strategy cannot shadow a built-in silently.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn RecoveryStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in strategies.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Names are distinct, registration cannot fail here.
        let _ = registry.register(Box::new(CanvasReset));
        let _ = registry.register(Box::new(CacheClear));
        let _ = registry.register(Box::new(SceneReload));
        registry
    }

    pub fn register(&mut self, strategy: Box<dyn RecoveryStrategy>) -> Result<(), RecoveryError> {
        if self.get(strategy.name()).is_some() {
            return Err(RecoveryError::DuplicateStrategy {
                name: strategy.name().to_string(),
            });
        }
        debug!(strategy = strategy.name(), "registered recovery strategy");
        self.strategies.push(strategy);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn RecoveryStrategy> {
        self.strategies
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Strategies claiming the context, in priority order.
    pub fn candidates(&self, ctx: &RecoveryContext<'_>) -> Vec<&dyn RecoveryStrategy> {
        let mut matched: Vec<&dyn RecoveryStrategy> = self
            .strategies
            .iter()
            .filter(|s| s.can_recover(ctx))
            .map(|s| s.as_ref())
            .collect();
        matched.sort_by_key(|s| s.priority());
        matched
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::traits::NullRuntime;

    fn ctx<'a>(
        message: &'a str,
        category: Category,
        severity: Severity,
        runtime: &'a dyn GameRuntime,
    ) -> RecoveryContext<'a> {
        RecoveryContext {
            error_id: "err_1",
            message,
            category,
            severity,
            fingerprint: Fingerprint(1),
            runtime,
        }
    }

    #[test]
    fn builtin_triggers() {
        let rt = NullRuntime;
        let canvas = CanvasReset;
        assert!(canvas.can_recover(&ctx("x", Category::Rendering, Severity::Low, &rt)));
        assert!(canvas.can_recover(&ctx("WebGL context lost", Category::General, Severity::Low, &rt)));
        assert!(!canvas.can_recover(&ctx("fetch failed", Category::Network, Severity::Low, &rt)));

        let cache = CacheClear;
        assert!(cache.can_recover(&ctx("x", Category::Memory, Severity::Low, &rt)));
        assert!(cache.can_recover(&ctx("quota exceeded", Category::General, Severity::Low, &rt)));

        let scene = SceneReload;
        assert!(scene.can_recover(&ctx("x", Category::General, Severity::High, &rt)));
        assert!(!scene.can_recover(&ctx("x", Category::General, Severity::Low, &rt)));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = StrategyRegistry::with_builtins();
        let err = registry.register(Box::new(CanvasReset)).unwrap_err();
        assert!(matches!(err, RecoveryError::DuplicateStrategy { .. }));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn candidates_ordered_by_priority() {
        let registry = StrategyRegistry::with_builtins();
        let rt = NullRuntime;
        // A rendering error at high severity matches canvas-reset and
        // scene-reload; canvas-reset has the lower priority value.
        let candidates =
            registry.candidates(&ctx("draw failed", Category::Rendering, Severity::High, &rt));
        let names: Vec<&str> = candidates.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["canvas-reset", "scene-reload"]);
    }

    #[test]
    fn builtin_recover_uses_runtime_hooks() {
        let rt = NullRuntime;
        let context = ctx("x", Category::Rendering, Severity::High, &rt);
        // NullRuntime reports every hook unavailable.
        assert!(matches!(
            CanvasReset.recover(&context),
            Err(RecoveryError::HookUnavailable { .. })
        ));
    }
}
