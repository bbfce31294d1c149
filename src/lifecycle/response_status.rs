//! Response status lifecycle.
//!
//! ```text
//!   New(0) → CustomerContactsSent(2) → ContactsExchanged(3) → Selected(4)
//!     │                │                       │                  │
//!     └────────────────┴───────► Rejected(1) ◄─┴──────────────────┘
//! ```
//!
//! Contacts are revealed one direction at a time. Neither side sees the
//! other's details until it has opted in itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::TransitionError;

/// Lifecycle status of one executor's (or mediator's) response to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResponseStatus {
    New,
    Rejected,
    CustomerContactsSent,
    ContactsExchanged,
    Selected,
}

impl ResponseStatus {
    pub const ALL: [ResponseStatus; 5] = [
        ResponseStatus::New,
        ResponseStatus::Rejected,
        ResponseStatus::CustomerContactsSent,
        ResponseStatus::ContactsExchanged,
        ResponseStatus::Selected,
    ];

    /// Parses a wire code.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::UnknownResponseStatus` for codes above 4.
    pub fn from_code(code: u8) -> Result<Self, TransitionError> {
        match code {
            0 => Ok(Self::New),
            1 => Ok(Self::Rejected),
            2 => Ok(Self::CustomerContactsSent),
            3 => Ok(Self::ContactsExchanged),
            4 => Ok(Self::Selected),
            other => Err(TransitionError::UnknownResponseStatus(other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::New => 0,
            Self::Rejected => 1,
            Self::CustomerContactsSent => 2,
            Self::ContactsExchanged => 3,
            Self::Selected => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Position along the forward handshake. Rejection has no rank.
    pub fn handshake_rank(&self) -> Option<u8> {
        match self {
            Self::New => Some(0),
            Self::CustomerContactsSent => Some(1),
            Self::ContactsExchanged => Some(2),
            Self::Selected => Some(3),
            Self::Rejected => None,
        }
    }

    /// Whether `next` is reachable from `self` in one step.
    pub fn can_transition_to(&self, next: ResponseStatus) -> bool {
        use ResponseStatus::*;

        matches!(
            (self, next),
            (New, CustomerContactsSent)
                | (CustomerContactsSent, ContactsExchanged)
                | (ContactsExchanged, Selected)
                | (New | CustomerContactsSent | ContactsExchanged | Selected, Rejected)
        )
    }

    /// Validates a single-step transition.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::IllegalTransition` when `next` is not reachable.
    pub fn validate_transition(&self, next: ResponseStatus) -> Result<(), TransitionError> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        let reason = if self.is_terminal() {
            "rejected responses are final"
        } else {
            "responses only move forward through the contact handshake"
        };
        Err(TransitionError::IllegalTransition {
            from: self.to_string(),
            to: next.to_string(),
            reason,
        })
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Rejected => "rejected",
            Self::CustomerContactsSent => "customer_contacts_sent",
            Self::ContactsExchanged => "contacts_exchanged",
            Self::Selected => "selected",
        };
        write!(f, "{}({})", name, self.code())
    }
}

impl TryFrom<u8> for ResponseStatus {
    type Error = TransitionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<ResponseStatus> for u8 {
    fn from(status: ResponseStatus) -> u8 {
        status.code()
    }
}
