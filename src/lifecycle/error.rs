use thiserror::Error;

/// Errors raised by the lifecycle state machines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unknown order status code: {0}")]
    UnknownOrderStatus(u8),
    #[error("Unknown response status code: {0}")]
    UnknownResponseStatus(u8),
    #[error("Illegal transition {from} -> {to}: {reason}")]
    IllegalTransition {
        from: String,
        to: String,
        reason: &'static str,
    },
}
