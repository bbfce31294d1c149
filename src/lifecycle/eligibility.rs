//! Action eligibility.
//!
//! [`available_actions`] is the only consumer of the two status machines on
//! the UI side. It is a single lookup over (role, order status, response
//! status) so the whole contract can be read and tested in one place.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::Role;

use super::order_status::OrderStatus;
use super::response_status::ResponseStatus;

/// Everything a screen may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UiAction {
    Respond,
    WithdrawResponse,
    SendContacts,
    RejectResponse,
    ChoosePerformer,
    TakeOrder,
    RejectOrder,
    ChangePerformer,
    RejectPerformer,
    ReturnToSearch,
    Complete,
    AcceptCompletion,
    RejectCompletion,
    Archive,
    CancelOrder,
    EditOrder,
    LeaveReview,
    AdvanceMediatorStep,
}

impl fmt::Display for UiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Ordered set of offered actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet(BTreeSet<UiAction>);

impl ActionSet {
    pub fn contains(&self, action: UiAction) -> bool {
        self.0.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = UiAction> + '_ {
        self.0.iter().copied()
    }

    fn with(mut self, action: UiAction) -> Self {
        self.0.insert(action);
        self
    }

    fn with_if(self, cond: bool, action: UiAction) -> Self {
        if cond {
            self.with(action)
        } else {
            self
        }
    }

    fn union(mut self, other: ActionSet) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl<const N: usize> From<[UiAction; N]> for ActionSet {
    fn from(actions: [UiAction; N]) -> Self {
        Self(actions.into_iter().collect())
    }
}

/// Caller-relative facts the table needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionContext {
    pub role: Role,
    pub order: OrderStatus,
    /// The order runs through the mediator statuses.
    pub mediated: bool,
    /// For a customer: the response card being rendered. For an
    /// executor/mediator: their own response.
    pub response: Option<ResponseStatus>,
    /// Caller is the order's selected performer.
    pub is_performer: bool,
    /// Some other response already holds `Selected`.
    pub sibling_selected: bool,
    pub completed_by_self: bool,
    pub archived_by_self: bool,
    pub reviewed_by_self: bool,
}

impl ActionContext {
    pub fn new(role: Role, order: OrderStatus) -> Self {
        Self {
            role,
            order,
            mediated: false,
            response: None,
            is_performer: false,
            sibling_selected: false,
            completed_by_self: false,
            archived_by_self: false,
            reviewed_by_self: false,
        }
    }

    pub fn with_response(mut self, response: Option<ResponseStatus>) -> Self {
        self.response = response;
        self
    }
}

/// The action table.
pub fn available_actions(ctx: &ActionContext) -> ActionSet {
    match ctx.role {
        Role::Customer => customer_order_actions(ctx).union(customer_response_actions(ctx)),
        Role::Executor | Role::Mediator => performer_actions(ctx),
    }
}

fn closing_actions(ctx: &ActionContext) -> ActionSet {
    ActionSet::default()
        .with_if(!ctx.reviewed_by_self, UiAction::LeaveReview)
        .with_if(!ctx.archived_by_self, UiAction::Archive)
}

fn customer_order_actions(ctx: &ActionContext) -> ActionSet {
    use OrderStatus::*;

    match ctx.order {
        SearchExecutor | SelectingExecutor => {
            ActionSet::from([UiAction::CancelOrder, UiAction::EditOrder])
        }
        ExecutorSelected => ActionSet::from([UiAction::CancelOrder, UiAction::ChangePerformer]),
        InWork if !ctx.completed_by_self => {
            ActionSet::from([UiAction::Complete, UiAction::ReturnToSearch])
        }
        // Completed on our side: offer archiving while the performer finishes.
        InWork => ActionSet::default().with_if(!ctx.archived_by_self, UiAction::Archive),
        AwaitingConfirmation => {
            ActionSet::from([UiAction::AcceptCompletion, UiAction::RejectCompletion])
        }
        Cancelled => ActionSet::default().with_if(!ctx.archived_by_self, UiAction::Archive),
        Rejected | Closed(_) => closing_actions(ctx),
        MediatorStep1 | MediatorStep2 | MediatorStep3 | MediatorArchived => ActionSet::default(),
    }
}

fn customer_response_actions(ctx: &ActionContext) -> ActionSet {
    if !ctx.order.is_pre_selection() || ctx.sibling_selected {
        return ActionSet::default();
    }
    match ctx.response {
        Some(ResponseStatus::New) => {
            ActionSet::from([UiAction::SendContacts, UiAction::RejectResponse])
        }
        Some(ResponseStatus::CustomerContactsSent) => ActionSet::from([UiAction::RejectResponse]),
        Some(ResponseStatus::ContactsExchanged) => ActionSet::default()
            .with(UiAction::RejectResponse)
            .with_if(ctx.order == OrderStatus::SelectingExecutor, UiAction::ChoosePerformer),
        Some(ResponseStatus::Rejected) | Some(ResponseStatus::Selected) | None => {
            ActionSet::default()
        }
    }
}

fn performer_actions(ctx: &ActionContext) -> ActionSet {
    use OrderStatus::*;

    if ctx.mediated {
        let own = ctx.role == Role::Mediator && ctx.is_performer;
        return match ctx.order {
            MediatorStep1 | MediatorStep2 | MediatorStep3 if own => {
                ActionSet::from([UiAction::AdvanceMediatorStep])
            }
            _ => ActionSet::default(),
        };
    }

    // Another executor was picked: nothing here is actionable any more.
    if ctx.sibling_selected && !ctx.is_performer {
        return ActionSet::default();
    }

    match (ctx.order, ctx.response) {
        (SearchExecutor | SelectingExecutor, None) => ActionSet::from([UiAction::Respond]),
        (SearchExecutor | SelectingExecutor, Some(ResponseStatus::New)) => {
            ActionSet::from([UiAction::WithdrawResponse])
        }
        (SearchExecutor | SelectingExecutor, Some(ResponseStatus::CustomerContactsSent)) => {
            ActionSet::from([UiAction::SendContacts, UiAction::RejectOrder])
        }
        (SelectingExecutor, Some(ResponseStatus::ContactsExchanged)) => ActionSet::from([UiAction::RejectOrder]),
        (ExecutorSelected, Some(ResponseStatus::Selected)) => {
            ActionSet::from([UiAction::TakeOrder, UiAction::RejectPerformer])
        }
        (InWork, Some(ResponseStatus::Selected)) if !ctx.completed_by_self => ActionSet::from([UiAction::Complete]),
        (InWork, Some(ResponseStatus::Selected)) => {
            ActionSet::default().with_if(!ctx.archived_by_self, UiAction::Archive)
        }
        (OrderStatus::Rejected | Closed(_), Some(ResponseStatus::Selected)) => closing_actions(ctx),
        (Cancelled, Some(r)) if r != ResponseStatus::Rejected => {
            ActionSet::default().with_if(!ctx.archived_by_self, UiAction::Archive)
        }
        _ => ActionSet::default(),
    }
}

/// The mutually exclusive state of a response card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePanel {
    /// No response yet; "respond" is the call to action.
    RespondEligible,
    /// Fresh response; it may still be withdrawn.
    WithdrawEligible,
    /// Customer revealed contacts, executor's turn.
    ContactsPending,
    /// Contacts exchanged; waiting for the customer's choice.
    SelectionEligible,
    RejectedMessage,
    SelectedMessage,
}

impl ResponsePanel {
    pub fn for_status(status: Option<ResponseStatus>) -> Self {
        match status {
            None => Self::RespondEligible,
            Some(ResponseStatus::New) => Self::WithdrawEligible,
            Some(ResponseStatus::CustomerContactsSent) => Self::ContactsPending,
            Some(ResponseStatus::ContactsExchanged) => Self::SelectionEligible,
            Some(ResponseStatus::Rejected) => Self::RejectedMessage,
            Some(ResponseStatus::Selected) => Self::SelectedMessage,
        }
    }

    pub fn is_respond_eligible(&self) -> bool {
        matches!(self, Self::RespondEligible)
    }

    pub fn is_withdraw_eligible(&self) -> bool {
        matches!(self, Self::WithdrawEligible)
    }

    pub fn is_contacts_pending(&self) -> bool {
        matches!(self, Self::ContactsPending)
    }

    pub fn is_selection_eligible(&self) -> bool {
        matches!(self, Self::SelectionEligible)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::RejectedMessage)
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::SelectedMessage)
    }
}
