use crate::domain::{Caller, CompletionOutcome, ContactBundle};
use crate::lifecycle::OrderStatus;

/// Custom actions for Order entities.
///
/// Each one is a status-changing request; the entity decides whether it is
/// legal for the current status and caller.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Executor or mediator responds to an open order.
    Respond,
    /// Executor deletes a response nobody has acted on yet.
    WithdrawResponse,
    /// Executor declines before selection, after contacts started flowing.
    RejectOrder,
    /// Customer reveals contacts to one response.
    ///
    /// # Arguments
    /// * `contacts` - copy of the customer's profile at the moment of sending
    SendContacts {
        response_id: String,
        contacts: ContactBundle,
    },
    /// Executor answers with their own contacts.
    SendExecutorContacts {
        response_id: String,
        contacts: ContactBundle,
    },
    RejectResponse { response_id: String },
    SelectPerformer { response_id: String },
    TakeOrder,
    /// Selected performer declines before starting.
    RejectPerformer,
    /// Customer drops the selected performer before work starts.
    ChangePerformer,
    ReturnToSearch,
    Complete { outcome: CompletionOutcome },
    ConfirmCompletion { accepted: bool },
    Cancel,
    Archive,
    SubmitReview { rating: u8, text: String },
    AdvanceMediatorStep,
}

/// An action together with who asked for it.
#[derive(Debug, Clone)]
pub struct OrderCommand {
    pub caller: Caller,
    pub action: OrderAction,
}

/// Results from OrderActions.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// A response was created.
    Responded { response_id: String },
    /// The action was applied; the order is now in `status`.
    Applied { status: OrderStatus },
}
