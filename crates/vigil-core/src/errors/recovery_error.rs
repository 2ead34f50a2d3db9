//! Recovery-layer errors. A strategy failure is counted as a failed
//! attempt and the next candidate is tried.

#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("unknown recovery strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("recovery strategy already registered: {name}")]
    DuplicateStrategy { name: String },

    #[error("strategy {strategy} failed: {message}")]
    StrategyFailed { strategy: String, message: String },

    #[error("recovery cancelled")]
    Cancelled,

    #[error("retry attempts exhausted after {attempts}")]
    Exhausted { attempts: u32 },

    #[error("runtime hook unavailable: {hook}")]
    HookUnavailable { hook: String },
}
