use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollapseError {
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },

    #[error("unknown view: {0:?} (expected default, waiting or completed)")]
    UnknownView(String),
}
