//! Error types shared across AirSketch crates.

/// Top-level error type for AirSketch operations.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error("Malformed hand observation: expected {expected} landmarks, got {actual}")]
    InputShape { expected: usize, actual: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Nothing to {stack}")]
    EmptyHistory { stack: HistoryStack },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Which history stack an operation ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryStack {
    Undo,
    Redo,
}

impl std::fmt::Display for HistoryStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// Result type alias using SketchError.
pub type SketchResult<T> = Result<T, SketchError>;

impl SketchError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    /// Whether this error is recovered inside the pipeline rather than
    /// surfaced to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InputShape { .. } | Self::EmptyHistory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SketchError::InputShape {
            expected: 21,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "Malformed hand observation: expected 21 landmarks, got 7"
        );

        let err = SketchError::EmptyHistory {
            stack: HistoryStack::Redo,
        };
        assert_eq!(err.to_string(), "Nothing to redo");
    }

    #[test]
    fn test_only_config_is_fatal() {
        assert!(SketchError::InputShape {
            expected: 21,
            actual: 0
        }
        .is_recoverable());
        assert!(SketchError::EmptyHistory {
            stack: HistoryStack::Undo
        }
        .is_recoverable());
        assert!(!SketchError::config("beta must be >= 0").is_recoverable());
    }
}
