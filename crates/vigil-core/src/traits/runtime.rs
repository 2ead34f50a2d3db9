//! Runtime/game collaborator: read-only state queries for context
//! enrichment plus the recovery hooks invoked by named strategies.
//! Every hook may fail; a hook failure is a normal strategy failure.

use crate::errors::RecoveryError;
use crate::models::RuntimeState;

pub trait GameRuntime {
    /// Point-in-time state snapshot (scene, counts, score).
    fn state(&self) -> RuntimeState;

    /// Reset the rendering surface.
    fn reset_surface(&self) -> Result<(), RecoveryError>;

    /// Clear runtime caches.
    fn clear_cache(&self) -> Result<(), RecoveryError>;

    /// Reload the current scene.
    fn reload_scene(&self) -> Result<(), RecoveryError>;
}

/// Runtime stand-in for configurations without a game attached: state is
/// empty and every hook reports itself unavailable.
#[derive(Debug, Default)]
pub struct NullRuntime;

impl GameRuntime for NullRuntime {
    fn state(&self) -> RuntimeState {
        RuntimeState::default()
    }

    fn reset_surface(&self) -> Result<(), RecoveryError> {
        Err(RecoveryError::HookUnavailable {
            hook: "reset_surface".into(),
        })
    }

    fn clear_cache(&self) -> Result<(), RecoveryError> {
        Err(RecoveryError::HookUnavailable {
            hook: "clear_cache".into(),
        })
    }

    fn reload_scene(&self) -> Result<(), RecoveryError> {
        Err(RecoveryError::HookUnavailable {
            hook: "reload_scene".into(),
        })
    }
}
