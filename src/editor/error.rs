use thiserror::Error;

/// Failures reported by editor operations. None of them are fatal: the
/// snapshot stays consistent and the action can be retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditorError {
    #[error("Order failed to load")]
    NotLoaded,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Store(String),
    /// The view went away while a request was in flight; nothing was published.
    #[error("Editor detached from its view")]
    Detached,
}
