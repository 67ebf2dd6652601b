use thiserror::Error;

/// Everything the engine can reject. All variants are raised before any
/// rect is produced, so a failed call never yields a partial timetable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid session(s): {}", ids.join(", "))]
    InvalidSession { ids: Vec<String> },
    #[error("duplicate session id(s): {}", ids.join(", "))]
    DuplicateSessionId { ids: Vec<String> },
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Session ids named by the error, empty for config errors.
    pub fn session_ids(&self) -> &[String] {
        match self {
            Self::InvalidSession { ids } | Self::DuplicateSessionId { ids } => ids,
            Self::InvalidConfig(_) => &[],
        }
    }
}
