use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::lifecycle::{OrderStatus, UiAction};
use crate::user_actor::UserError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Response not found: {0}")]
    ResponseNotFound(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    /// Refused on the client before anything was sent.
    #[error("Action {action} is not available in status {status}")]
    ActionNotAvailable { action: UiAction, status: OrderStatus },
    /// The backend refused; the message is shown as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("Request cancelled: screen closed")]
    Cancelled,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    /// Transport failures can be retried; everything else needs a new decision.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::ActorCommunicationError(_))
    }
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Rejected(msg) => OrderError::Rejected(msg),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<UserError> for OrderError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
            other => OrderError::InvalidUser(other.to_string()),
        }
    }
}
