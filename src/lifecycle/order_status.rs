//! Order status lifecycle.
//!
//! ```text
//!   SearchExecutor(0) → SelectingExecutor(2) ⇄ ExecutorSelected(3) → InWork(4)
//!         ↑                      │                    │                 │
//!         │                      └─── Cancelled(1) ◄──┘                 ↓
//!         └──────────────── return to search ◄──────────── AwaitingConfirmation(5)
//!                                                                  │         │
//!                                                           Closed(7|8)  Rejected(6)
//!
//!   MediatorStep1(10) → MediatorStep2(11) → MediatorStep3(12) → MediatorArchived(13)
//! ```
//!
//! Integer codes are the wire contract. Codes 7 and 8 are both "successfully
//! completed" and share the [`OrderStatus::Closed`] variant; the original code
//! survives only as a [`SuccessCode`] tag for serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::TransitionError;

/// Which wire code a closed order carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuccessCode {
    /// Wire code 7.
    Closed,
    /// Wire code 8.
    Completed,
}

/// Lifecycle status of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderStatus {
    /// Open for responses
    SearchExecutor,
    /// Customer cancelled before work started
    Cancelled,
    /// At least one response has exchanged contacts
    SelectingExecutor,
    /// Customer has chosen a performer
    ExecutorSelected,
    /// Performer accepted and is working
    InWork,
    /// Both parties marked the work complete, customer confirming
    AwaitingConfirmation,
    /// Rejected after selection
    Rejected,
    /// Successfully completed
    Closed(SuccessCode),
    /// Mediator workflow: clarifying details
    MediatorStep1,
    /// Mediator workflow: executor search
    MediatorStep2,
    /// Mediator workflow: project execution
    MediatorStep3,
    /// Mediator workflow: archived
    MediatorArchived,
}

/// Wire code mapping. Both directions go through this table.
const WIRE_TABLE: &[(u8, OrderStatus)] = &[
    (0, OrderStatus::SearchExecutor),
    (1, OrderStatus::Cancelled),
    (2, OrderStatus::SelectingExecutor),
    (3, OrderStatus::ExecutorSelected),
    (4, OrderStatus::InWork),
    (5, OrderStatus::AwaitingConfirmation),
    (6, OrderStatus::Rejected),
    (7, OrderStatus::Closed(SuccessCode::Closed)),
    (8, OrderStatus::Closed(SuccessCode::Completed)),
    (10, OrderStatus::MediatorStep1),
    (11, OrderStatus::MediatorStep2),
    (12, OrderStatus::MediatorStep3),
    (13, OrderStatus::MediatorArchived),
];

impl OrderStatus {
    /// Every status, in wire-code order.
    pub const ALL: [OrderStatus; 13] = [
        OrderStatus::SearchExecutor,
        OrderStatus::Cancelled,
        OrderStatus::SelectingExecutor,
        OrderStatus::ExecutorSelected,
        OrderStatus::InWork,
        OrderStatus::AwaitingConfirmation,
        OrderStatus::Rejected,
        OrderStatus::Closed(SuccessCode::Closed),
        OrderStatus::Closed(SuccessCode::Completed),
        OrderStatus::MediatorStep1,
        OrderStatus::MediatorStep2,
        OrderStatus::MediatorStep3,
        OrderStatus::MediatorArchived,
    ];

    /// Parses a wire code.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::UnknownOrderStatus` for codes outside the table (9, 14, ...).
    pub fn from_code(code: u8) -> Result<Self, TransitionError> {
        WIRE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, status)| *status)
            .ok_or(TransitionError::UnknownOrderStatus(code))
    }

    /// Returns the wire code.
    pub fn code(&self) -> u8 {
        match self {
            Self::SearchExecutor => 0,
            Self::Cancelled => 1,
            Self::SelectingExecutor => 2,
            Self::ExecutorSelected => 3,
            Self::InWork => 4,
            Self::AwaitingConfirmation => 5,
            Self::Rejected => 6,
            Self::Closed(SuccessCode::Closed) => 7,
            Self::Closed(SuccessCode::Completed) => 8,
            Self::MediatorStep1 => 10,
            Self::MediatorStep2 => 11,
            Self::MediatorStep3 => 12,
            Self::MediatorArchived => 13,
        }
    }

    /// Cancelled, Rejected, Closed and MediatorArchived never move again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Rejected | Self::Closed(_) | Self::MediatorArchived
        )
    }

    /// Responses may still be submitted and handled.
    pub fn is_pre_selection(&self) -> bool {
        matches!(self, Self::SearchExecutor | Self::SelectingExecutor)
    }

    /// The order-level contact snapshot supersedes per-response contacts
    /// in these statuses.
    pub fn is_post_selection(&self) -> bool {
        matches!(
            self,
            Self::InWork
                | Self::AwaitingConfirmation
                | Self::Rejected
                | Self::Closed(_)
        )
    }

    pub fn is_mediator(&self) -> bool {
        matches!(
            self,
            Self::MediatorStep1 | Self::MediatorStep2 | Self::MediatorStep3 | Self::MediatorArchived
        )
    }

    /// Whether a performer may be attached in this status (`status >= 3`).
    pub fn allows_performer(&self) -> bool {
        self.code() >= 3
    }

    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            Self::SearchExecutor | Self::SelectingExecutor | Self::ExecutorSelected
        )
    }

    /// Whether `next` is reachable from `self` in one step.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        match (self, next) {
            (SearchExecutor | SelectingExecutor | ExecutorSelected, Cancelled) => true,
            (SearchExecutor, SelectingExecutor) => true,
            (SelectingExecutor, ExecutorSelected) => true,
            (ExecutorSelected, SelectingExecutor) => true,
            (SelectingExecutor | ExecutorSelected, InWork) => true,
            (InWork, SearchExecutor) => true,
            (InWork, AwaitingConfirmation) => true,
            (AwaitingConfirmation, Closed(_)) => true,
            (AwaitingConfirmation, Rejected) => true,
            (MediatorStep1, MediatorStep2) => true,
            (MediatorStep2, MediatorStep3) => true,
            (MediatorStep3, MediatorArchived) => true,
            _ => false,
        }
    }

    /// Validates a single-step transition.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::IllegalTransition` when `next` is not reachable.
    pub fn validate_transition(&self, next: OrderStatus) -> Result<(), TransitionError> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        let reason = if self.is_terminal() {
            "cannot transition from terminal state"
        } else if next == OrderStatus::Cancelled {
            "order can only be cancelled before work starts"
        } else {
            "transition not permitted by order lifecycle rules"
        };
        Err(TransitionError::IllegalTransition {
            from: self.to_string(),
            to: next.to_string(),
            reason,
        })
    }

    /// Statuses reachable from `self` in one step.
    pub fn next_valid_states(&self) -> Vec<OrderStatus> {
        Self::ALL
            .iter()
            .copied()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    /// The next mediator step, if any.
    pub fn next_mediator_step(&self) -> Option<OrderStatus> {
        match self {
            Self::MediatorStep1 => Some(Self::MediatorStep2),
            Self::MediatorStep2 => Some(Self::MediatorStep3),
            Self::MediatorStep3 => Some(Self::MediatorArchived),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SearchExecutor => "search_executor",
            Self::Cancelled => "cancelled",
            Self::SelectingExecutor => "selecting_executor",
            Self::ExecutorSelected => "executor_selected",
            Self::InWork => "in_work",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Rejected => "rejected",
            Self::Closed(_) => "closed",
            Self::MediatorStep1 => "mediator_step_1",
            Self::MediatorStep2 => "mediator_step_2",
            Self::MediatorStep3 => "mediator_step_3",
            Self::MediatorArchived => "mediator_archived",
        };
        write!(f, "{}({})", name, self.code())
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = TransitionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> u8 {
        status.code()
    }
}
