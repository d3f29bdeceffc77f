use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),
    #[error("Customer validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CustomerError {
    pub fn user_message(&self) -> Option<String> {
        match self {
            CustomerError::NotFound(id) => Some(format!("Customer {} not found", id)),
            CustomerError::ValidationError(msg) if !msg.is_empty() => Some(msg.clone()),
            _ => None,
        }
    }
}

impl From<FrameworkError> for CustomerError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CustomerError::NotFound(id),
            FrameworkError::Rejected(msg) => CustomerError::ValidationError(msg),
            other => CustomerError::ActorCommunicationError(other.to_string()),
        }
    }
}
