use tracing::debug;

use super::actions::{OrderAction, OrderActionResult, OrderCommand};
use crate::actor_framework::Entity;
use crate::domain::{
    Caller, CompletionOutcome, ContactBundle, Order, OrderCreate, OrderPatch, Party, Response,
    Review, Role, Workflow,
};
use crate::lifecycle::{OrderStatus, ResponseStatus, SuccessCode};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderCommand;
    type ActionResult = OrderActionResult;

    /// Creates a new Order from creation parameters.
    ///
    /// Direct orders open in `SearchExecutor`. Mediated orders start at
    /// `MediatorStep1` with the mediator already attached as performer.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        if params.title.trim().is_empty() {
            return Err("Order title must not be empty".to_string());
        }
        let mut order = Order::new(id, params.author, params.title);
        order.description = params.description;
        order.budget = params.budget;
        order.workflow = params.workflow;

        match (params.workflow, params.mediator) {
            (Workflow::Direct, None) => {}
            (Workflow::Direct, Some(_)) => {
                return Err("Direct orders cannot name a mediator".to_string());
            }
            (Workflow::Mediated, None) => {
                return Err("Mediated orders require a mediator".to_string());
            }
            (Workflow::Mediated, Some(mediator)) => {
                order.status = OrderStatus::MediatorStep1;
                order.selected_performer = Some(mediator);
                order.additional.executor_contacts = params.mediator_contacts;
                order.additional.customer_contacts = params.customer_contacts;
            }
        }
        Ok(order)
    }

    fn on_create(&mut self) -> Result<(), String> {
        self.check_invariants()
    }

    /// Edits title, description or budget.
    ///
    /// Only the author may edit, and only before a performer is chosen.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), String> {
        if !self.is_author(&patch.editor) {
            return Err("Only the order author can edit it".to_string());
        }
        if !self.status.is_pre_selection() || self.workflow == Workflow::Mediated {
            return Err(format!(
                "Order {} cannot be edited in status {}",
                self.id, self.status
            ));
        }
        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err("Order title must not be empty".to_string());
            }
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(budget) = patch.budget {
            self.budget = Some(budget);
        }
        Ok(())
    }

    /// Applies one lifecycle action on behalf of `command.caller`.
    ///
    /// # Errors
    /// Any rule violation is returned as a message for the caller. The
    /// actor only commits the mutated copy when this returns `Ok`.
    fn handle_action(&mut self, command: OrderCommand) -> Result<OrderActionResult, String> {
        let OrderCommand { caller, action } = command;
        debug!(order_id = %self.id, status = %self.status, user_id = %caller.user_id, "Applying order action");

        let result = match action {
            OrderAction::Respond => self.respond(&caller),
            OrderAction::WithdrawResponse => self.withdraw_response(&caller),
            OrderAction::RejectOrder => self.reject_order(&caller),
            OrderAction::SendContacts { response_id, contacts } => {
                self.send_contacts(&caller, &response_id, contacts)
            }
            OrderAction::SendExecutorContacts { response_id, contacts } => {
                self.send_executor_contacts(&caller, &response_id, contacts)
            }
            OrderAction::RejectResponse { response_id } => self.reject_response(&caller, &response_id),
            OrderAction::SelectPerformer { response_id } => self.select_performer(&caller, &response_id),
            OrderAction::TakeOrder => self.take_order(&caller),
            OrderAction::RejectPerformer => {
                self.require_performer(&caller)?;
                self.drop_performer()
            }
            OrderAction::ChangePerformer => {
                self.require_author(&caller)?;
                self.drop_performer()
            }
            OrderAction::ReturnToSearch => self.return_to_search(&caller),
            OrderAction::Complete { outcome } => self.complete(&caller, outcome),
            OrderAction::ConfirmCompletion { accepted } => self.confirm_completion(&caller, accepted),
            OrderAction::Cancel => self.cancel(&caller),
            OrderAction::Archive => self.archive(&caller),
            OrderAction::SubmitReview { rating, text } => self.submit_review(&caller, rating, text),
            OrderAction::AdvanceMediatorStep => self.advance_mediator_step(&caller),
        }?;

        self.check_invariants()?;
        Ok(result)
    }
}

impl Order {
    fn applied(&self) -> OrderActionResult {
        OrderActionResult::Applied {
            status: self.status,
        }
    }

    fn transition(&mut self, next: OrderStatus) -> Result<OrderActionResult, String> {
        self.status
            .validate_transition(next)
            .map_err(|e| e.to_string())?;
        self.status = next;
        Ok(self.applied())
    }

    fn require_author(&self, caller: &Caller) -> Result<(), String> {
        if self.is_author(&caller.user_id) {
            Ok(())
        } else {
            Err(format!("Only the author of order {} can do this", self.id))
        }
    }

    fn require_performer(&self, caller: &Caller) -> Result<(), String> {
        if self.is_performer(&caller.user_id) {
            Ok(())
        } else {
            Err(format!("Only the selected performer of order {} can do this", self.id))
        }
    }

    fn require_pre_selection(&self) -> Result<(), String> {
        if self.status.is_pre_selection() && self.selected_response().is_none() {
            Ok(())
        } else {
            Err(format!(
                "Order {} no longer accepts response changes in status {}",
                self.id, self.status
            ))
        }
    }

    fn own_response_mut(&mut self, caller: &Caller) -> Result<&mut Response, String> {
        let order_id = self.id.clone();
        self.responses
            .iter_mut()
            .find(|r| r.executor == caller.user_id)
            .ok_or_else(|| format!("User {} has no response on order {}", caller.user_id, order_id))
    }

    fn response_or_err(&mut self, response_id: &str) -> Result<&mut Response, String> {
        let order_id = self.id.clone();
        self.response_mut(response_id)
            .ok_or_else(|| format!("Response {} not found on order {}", response_id, order_id))
    }

    fn respond(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        if caller.role == Role::Customer {
            return Err("Only executors and mediators can respond to orders".to_string());
        }
        if self.workflow == Workflow::Mediated || self.is_author(&caller.user_id) {
            return Err(format!("User {} cannot respond to order {}", caller.user_id, self.id));
        }
        if !self.status.is_pre_selection() {
            return Err(format!(
                "Order {} is not accepting responses in status {}",
                self.id, self.status
            ));
        }
        if self.response_by_executor(&caller.user_id).is_some() {
            return Err(format!("User {} already responded to order {}", caller.user_id, self.id));
        }

        self.response_seq += 1;
        let response_id = format!("{}_response_{}", self.id, self.response_seq);
        self.responses.push(Response::new(
            response_id.clone(),
            self.id.clone(),
            caller.user_id.clone(),
            caller.role,
        ));
        Ok(OrderActionResult::Responded { response_id })
    }

    fn withdraw_response(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        let response = self.own_response_mut(caller)?;
        if response.status != ResponseStatus::New {
            return Err(format!(
                "Response {} can no longer be withdrawn in status {}",
                response.id, response.status
            ));
        }
        let response_id = response.id.clone();
        self.responses.retain(|r| r.id != response_id);
        Ok(self.applied())
    }

    fn reject_order(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        self.require_pre_selection()?;
        let response = self.own_response_mut(caller)?;
        if !matches!(
            response.status,
            ResponseStatus::CustomerContactsSent | ResponseStatus::ContactsExchanged
        ) {
            return Err(format!(
                "Response {} cannot decline the order in status {}",
                response.id, response.status
            ));
        }
        response.advance(ResponseStatus::Rejected)?;
        Ok(self.applied())
    }

    fn send_contacts(
        &mut self,
        caller: &Caller,
        response_id: &str,
        contacts: ContactBundle,
    ) -> Result<OrderActionResult, String> {
        self.require_author(caller)?;
        self.require_pre_selection()?;
        let response = self.response_or_err(response_id)?;
        response.advance(ResponseStatus::CustomerContactsSent)?;
        response.customer_contacts = Some(contacts);
        Ok(self.applied())
    }

    fn send_executor_contacts(
        &mut self,
        caller: &Caller,
        response_id: &str,
        contacts: ContactBundle,
    ) -> Result<OrderActionResult, String> {
        self.require_pre_selection()?;
        let response = self.response_or_err(response_id)?;
        if response.executor != caller.user_id {
            return Err(format!("Response {} belongs to another user", response_id));
        }
        response.advance(ResponseStatus::ContactsExchanged)?;
        response.executor_contacts = Some(contacts);

        if self.status == OrderStatus::SearchExecutor {
            self.transition(OrderStatus::SelectingExecutor)
        } else {
            Ok(self.applied())
        }
    }

    fn reject_response(&mut self, caller: &Caller, response_id: &str) -> Result<OrderActionResult, String> {
        self.require_author(caller)?;
        self.require_pre_selection()?;
        self.response_or_err(response_id)?
            .advance(ResponseStatus::Rejected)?;
        Ok(self.applied())
    }

    /// Marks `response_id` as selected and snapshots its contacts onto the order.
    fn attach_performer(&mut self, response_id: &str) -> Result<(), String> {
        if self.selected_response().is_some() {
            return Err(format!("Order {} already has a selected performer", self.id));
        }
        let response = self.response_or_err(response_id)?;
        response.advance(ResponseStatus::Selected)?;
        let performer = response.executor.clone();
        let snapshot = response.executor_contacts.clone();
        self.selected_performer = Some(performer);
        self.additional.executor_contacts = snapshot;
        Ok(())
    }

    fn select_performer(&mut self, caller: &Caller, response_id: &str) -> Result<OrderActionResult, String> {
        self.require_author(caller)?;
        self.status
            .validate_transition(OrderStatus::ExecutorSelected)
            .map_err(|e| e.to_string())?;
        self.attach_performer(response_id)?;
        self.transition(OrderStatus::ExecutorSelected)
    }

    fn take_order(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        self.status
            .validate_transition(OrderStatus::InWork)
            .map_err(|e| e.to_string())?;
        match self.status {
            OrderStatus::ExecutorSelected => self.require_performer(caller)?,
            // Taking straight from selection makes the caller the performer.
            _ => {
                let response_id = self
                    .response_by_executor(&caller.user_id)
                    .map(|r| r.id.clone())
                    .ok_or_else(|| format!("User {} has no response on order {}", caller.user_id, self.id))?;
                self.attach_performer(&response_id)?;
            }
        }
        self.transition(OrderStatus::InWork)
    }

    /// Releases the selected response (it becomes rejected) and clears the snapshot.
    fn release_performer(&mut self) -> Result<(), String> {
        let selected_id = self.selected_response().map(|r| r.id.clone());
        if let Some(id) = selected_id {
            self.response_or_err(&id)?.advance(ResponseStatus::Rejected)?;
        }
        self.selected_performer = None;
        self.additional.executor_contacts = None;
        Ok(())
    }

    fn drop_performer(&mut self) -> Result<OrderActionResult, String> {
        if self.status != OrderStatus::ExecutorSelected {
            return Err(format!(
                "Order {} has no performer to drop in status {}",
                self.id, self.status
            ));
        }
        self.release_performer()?;
        self.transition(OrderStatus::SelectingExecutor)
    }

    fn return_to_search(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        self.require_author(caller)?;
        self.status
            .validate_transition(OrderStatus::SearchExecutor)
            .map_err(|e| e.to_string())?;
        self.release_performer()?;
        self.completed_by_customer = false;
        self.completed_by_executor = false;
        self.customer_outcome = None;
        self.executor_outcome = None;
        self.transition(OrderStatus::SearchExecutor)?;

        // Responses that already exchanged contacts stay selectable.
        if self.has_exchanged_response() {
            self.transition(OrderStatus::SelectingExecutor)
        } else {
            Ok(self.applied())
        }
    }

    fn has_exchanged_response(&self) -> bool {
        self.responses
            .iter()
            .any(|r| r.status == ResponseStatus::ContactsExchanged)
    }

    fn complete(&mut self, caller: &Caller, outcome: CompletionOutcome) -> Result<OrderActionResult, String> {
        if self.status != OrderStatus::InWork {
            return Err(format!(
                "Order {} cannot be completed in status {}",
                self.id, self.status
            ));
        }
        let party = if self.is_author(&caller.user_id) {
            Party::Customer
        } else if self.is_performer(&caller.user_id) {
            Party::Executor
        } else {
            return Err(format!("User {} is not a party to order {}", caller.user_id, self.id));
        };
        if self.completed_by(party) {
            return Err(format!("Order {} is already marked complete by this side", self.id));
        }
        match party {
            Party::Customer => {
                self.completed_by_customer = true;
                self.customer_outcome = Some(outcome);
            }
            Party::Executor => {
                self.completed_by_executor = true;
                self.executor_outcome = Some(outcome);
            }
        }

        if self.completed_by_customer && self.completed_by_executor {
            self.transition(OrderStatus::AwaitingConfirmation)
        } else {
            Ok(self.applied())
        }
    }

    fn confirm_completion(&mut self, caller: &Caller, accepted: bool) -> Result<OrderActionResult, String> {
        self.require_author(caller)?;
        let next = if accepted {
            OrderStatus::Closed(SuccessCode::Closed)
        } else {
            OrderStatus::Rejected
        };
        self.transition(next)
    }

    fn cancel(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        self.require_author(caller)?;
        if !self.status.can_cancel() {
            return Err(format!(
                "Order {} cannot be cancelled in status {}",
                self.id, self.status
            ));
        }
        self.selected_performer = None;
        self.additional.executor_contacts = None;
        self.transition(OrderStatus::Cancelled)
    }

    fn archive(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        let party = self
            .party_of(&caller.user_id)
            .ok_or_else(|| format!("User {} is not a party to order {}", caller.user_id, self.id))?;
        if !self.status.is_terminal() && !self.completed_by(party) {
            return Err(format!(
                "Order {} cannot be archived in status {}",
                self.id, self.status
            ));
        }
        match party {
            Party::Customer => self.customer_archived = true,
            Party::Executor => self.executor_archived = true,
        }
        Ok(self.applied())
    }

    fn submit_review(&mut self, caller: &Caller, rating: u8, text: String) -> Result<OrderActionResult, String> {
        if !self.is_author(&caller.user_id) && !self.is_performer(&caller.user_id) {
            return Err(format!("User {} is not a party to order {}", caller.user_id, self.id));
        }
        if !matches!(self.status, OrderStatus::Closed(_) | OrderStatus::Rejected) {
            return Err(format!(
                "Order {} cannot be reviewed in status {}",
                self.id, self.status
            ));
        }
        if !(1..=5).contains(&rating) {
            return Err(format!("Rating must be between 1 and 5, got {}", rating));
        }
        if self.reviewed_by(&caller.user_id) {
            return Err(format!("User {} already reviewed order {}", caller.user_id, self.id));
        }
        self.reviews.push(Review {
            author: caller.user_id.clone(),
            rating,
            text,
        });
        Ok(self.applied())
    }

    fn advance_mediator_step(&mut self, caller: &Caller) -> Result<OrderActionResult, String> {
        if self.workflow != Workflow::Mediated || caller.role != Role::Mediator {
            return Err(format!("Order {} is not run by a mediator", self.id));
        }
        self.require_performer(caller)?;
        let next = self
            .status
            .next_mediator_step()
            .ok_or_else(|| format!("Order {} has no further mediator step", self.id))?;
        self.transition(next)
    }
}
