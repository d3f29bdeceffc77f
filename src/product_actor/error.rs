use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ProductError {
    pub fn user_message(&self) -> Option<String> {
        match self {
            ProductError::NotFound(id) => Some(format!("Product {} is not in the catalog", id)),
            ProductError::Rejected(msg) if !msg.is_empty() => Some(msg.clone()),
            _ => None,
        }
    }
}

impl From<FrameworkError> for ProductError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::Rejected(msg) => ProductError::Rejected(msg),
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}
