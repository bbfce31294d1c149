use serde::{Deserialize, Serialize};

use super::contacts::ContactBundle;
use super::response::Response;
use super::user::{Caller, Role};
use crate::lifecycle::{
    available_actions, ActionContext, ActionSet, OrderStatus, ResponseStatus,
};

/// Whether the order runs the direct or the mediator workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    #[default]
    Direct,
    Mediated,
}

/// The two sides of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Customer,
    Executor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    Success,
    WithIssues,
}

/// Data exchanged alongside the order itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderAdditional {
    /// Snapshot of the performer's contacts taken at selection time.
    pub executor_contacts: Option<ContactBundle>,
    /// Customer contacts handed to the mediator when a mediated order opens.
    #[serde(default)]
    pub customer_contacts: Option<ContactBundle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub text: String,
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub author: String,
    pub title: String,
    pub description: String,
    pub budget: Option<u64>,
    pub workflow: Workflow,
    pub selected_performer: Option<String>,
    pub responses: Vec<Response>,
    pub completed_by_customer: bool,
    pub completed_by_executor: bool,
    pub customer_outcome: Option<CompletionOutcome>,
    pub executor_outcome: Option<CompletionOutcome>,
    pub customer_archived: bool,
    pub executor_archived: bool,
    pub additional: OrderAdditional,
    pub reviews: Vec<Review>,
    #[serde(skip)]
    pub(crate) response_seq: u64,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub author: String,
    pub title: String,
    pub description: String,
    pub budget: Option<u64>,
    pub workflow: Workflow,
    /// Required for mediated orders: the mediator running it.
    pub mediator: Option<String>,
    pub mediator_contacts: Option<ContactBundle>,
    /// Mediated orders only: the author's contacts at creation.
    pub customer_contacts: Option<ContactBundle>,
}

impl OrderCreate {
    pub fn direct(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            description: String::new(),
            budget: None,
            workflow: Workflow::Direct,
            mediator: None,
            mediator_contacts: None,
            customer_contacts: None,
        }
    }
}

/// Edits the customer may make before a performer is chosen.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    /// User id of whoever is editing.
    pub editor: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<u64>,
}

impl Order {
    pub fn new(id: impl Into<String>, author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: OrderStatus::SearchExecutor,
            author: author.into(),
            title: title.into(),
            description: String::new(),
            budget: None,
            workflow: Workflow::Direct,
            selected_performer: None,
            responses: Vec::new(),
            completed_by_customer: false,
            completed_by_executor: false,
            customer_outcome: None,
            executor_outcome: None,
            customer_archived: false,
            executor_archived: false,
            additional: OrderAdditional::default(),
            reviews: Vec::new(),
            response_seq: 0,
        }
    }

    pub fn is_author(&self, user_id: &str) -> bool {
        self.author == user_id
    }

    pub fn is_performer(&self, user_id: &str) -> bool {
        self.selected_performer.as_deref() == Some(user_id)
    }

    pub fn response(&self, response_id: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.id == response_id)
    }

    pub(crate) fn response_mut(&mut self, response_id: &str) -> Option<&mut Response> {
        self.responses.iter_mut().find(|r| r.id == response_id)
    }

    /// The caller's own response, if they responded.
    pub fn response_by_executor(&self, user_id: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.executor == user_id)
    }

    pub fn selected_response(&self) -> Option<&Response> {
        self.responses
            .iter()
            .find(|r| r.status == ResponseStatus::Selected)
    }

    /// Responses a customer can still act on. Once a performer is selected
    /// every other non-rejected response is superseded and filtered out.
    pub fn actionable_responses(&self) -> Vec<&Response> {
        match self.selected_response() {
            Some(selected) => vec![selected],
            None => self
                .responses
                .iter()
                .filter(|r| r.status != ResponseStatus::Rejected)
                .collect(),
        }
    }

    /// Which side of the order `user_id` is on.
    pub fn party_of(&self, user_id: &str) -> Option<Party> {
        if self.is_author(user_id) {
            Some(Party::Customer)
        } else if self.is_performer(user_id) || self.response_by_executor(user_id).is_some() {
            Some(Party::Executor)
        } else {
            None
        }
    }

    pub fn completed_by(&self, party: Party) -> bool {
        match party {
            Party::Customer => self.completed_by_customer,
            Party::Executor => self.completed_by_executor,
        }
    }

    pub fn archived_by(&self, party: Party) -> bool {
        match party {
            Party::Customer => self.customer_archived,
            Party::Executor => self.executor_archived,
        }
    }

    pub fn reviewed_by(&self, user_id: &str) -> bool {
        self.reviews.iter().any(|r| r.author == user_id)
    }

    /// Facts the action table needs, relative to `caller`. For customers
    /// `response_id` names the response card being rendered.
    pub fn action_context(&self, caller: &Caller, response_id: Option<&str>) -> ActionContext {
        let party = self.party_of(&caller.user_id);
        let response = match caller.role {
            Role::Customer => response_id.and_then(|id| self.response(id)),
            Role::Executor | Role::Mediator => self.response_by_executor(&caller.user_id),
        };
        let sibling_selected = match (self.selected_response(), response) {
            (Some(selected), Some(own)) => selected.id != own.id,
            (Some(_), None) => true,
            (None, _) => false,
        };

        ActionContext {
            role: caller.role,
            order: self.status,
            mediated: self.workflow == Workflow::Mediated,
            response: response.map(|r| r.status),
            is_performer: self.is_performer(&caller.user_id),
            sibling_selected,
            completed_by_self: party.is_some_and(|p| self.completed_by(p)),
            archived_by_self: party.is_some_and(|p| self.archived_by(p)),
            reviewed_by_self: self.reviewed_by(&caller.user_id),
        }
    }

    /// Actions `caller` may be offered. Customers other than the author get none.
    pub fn available_actions_for(&self, caller: &Caller, response_id: Option<&str>) -> ActionSet {
        if caller.role == Role::Customer && !self.is_author(&caller.user_id) {
            return ActionSet::default();
        }
        available_actions(&self.action_context(caller, response_id))
    }

    /// Checks the structural invariants that hold after every transition.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.selected_performer.is_some() && !self.status.allows_performer() {
            return Err(format!(
                "Order {} has a performer while in status {}",
                self.id, self.status
            ));
        }
        let selected = self
            .responses
            .iter()
            .filter(|r| r.status == ResponseStatus::Selected)
            .count();
        if selected > 1 {
            return Err(format!(
                "Order {} has {} selected responses",
                self.id, selected
            ));
        }
        Ok(())
    }
}
