use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    /// The store refused the request; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    /// The message to show the user, if the store supplied a meaningful one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            OrderError::NotFound(id) => Some(format!("Order {} no longer exists", id)),
            OrderError::ValidationError(msg) | OrderError::Rejected(msg) if !msg.is_empty() => {
                Some(msg.clone())
            }
            _ => None,
        }
    }
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Rejected(msg) => OrderError::Rejected(msg),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
