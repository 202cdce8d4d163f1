use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid config `{field}`: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Reasons a session refuses a control request. Gameplay outcomes (misses,
/// depletion, fallback beatmaps) are state transitions and never show up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("no difficulty selected")]
    NoDifficulty,

    #[error("session is already playing; end or reset it first")]
    AlreadyRunning,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
