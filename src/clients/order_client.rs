use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::UserClient;
use crate::domain::{CompletionOutcome, ContactBundle, Order, OrderCreate, OrderPatch, Role, Workflow};
use crate::lifecycle::UiAction;
use crate::order_actor::{OrderAction, OrderCommand, OrderError};
use crate::session::Session;

/// Client for interacting with the Order actor.
///
/// Every mutating call follows the same cycle: fetch the order, check the
/// action against the eligibility table for this session, send it, then
/// re-fetch and return what the backend now holds. Local state is never
/// patched speculatively.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, user_client: UserClient) -> Self {
        Self { inner, user_client }
    }

    #[instrument(skip(self, session, params), fields(user_id = %session.user_id(), workflow = ?params.workflow))]
    pub async fn create_order(&self, session: &Session, mut params: OrderCreate) -> Result<String, OrderError> {
        info!("Processing create_order request (Client Side)");

        // Step 1: Validate the author
        let author = match self.user_client.get_user(params.author.clone()).await {
            Ok(Some(user)) if user.role == Role::Customer => {
                info!(user_name = %user.name, "Author validation successful");
                user
            }
            Ok(Some(_)) => {
                error!("Author is not a customer");
                return Err(OrderError::InvalidUser(params.author));
            }
            Ok(None) => {
                error!("Author not found");
                return Err(OrderError::InvalidUser(params.author));
            }
            Err(e) => {
                error!(error = %e, "Author validation failed");
                return Err(e.into());
            }
        };

        // Step 2: Check who may open this kind of order
        match (params.workflow, session.role()) {
            (Workflow::Direct, Role::Customer) if params.author == session.user_id() => {}
            (Workflow::Mediated, Role::Mediator) => {
                params.mediator = Some(session.user_id().to_string());
                params.mediator_contacts = Some(session.user().contacts.clone());
                params.customer_contacts = Some(author.contacts);
            }
            _ => {
                warn!("Session may not create this order");
                return Err(OrderError::ValidationError(format!(
                    "{:?} cannot create a {:?} order for {}",
                    session.role(),
                    params.workflow,
                    params.author
                )));
            }
        }

        // Step 3: Create order in ResourceActor
        let id = self.inner.create(params).await?;
        info!(order_id = %id, "Order created");
        Ok(id)
    }

    #[instrument(skip(self, session, patch), fields(user_id = %session.user_id()))]
    pub async fn edit_order(&self, session: &Session, order_id: String, mut patch: OrderPatch) -> Result<Order, OrderError> {
        self.gate(session, &order_id, UiAction::EditOrder, None).await?;
        patch.editor = session.user_id().to_string();
        debug!("Sending request");
        self.inner.update(order_id.clone(), patch).await?;
        self.fetch_order(order_id).await
    }

    /// Customer reveals contacts to one response (Response 0 → 2).
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn send_contacts(&self, session: &Session, order_id: String, response_id: String) -> Result<Order, OrderError> {
        let contacts = self.live_contacts(session).await?;
        let action = OrderAction::SendContacts {
            response_id: response_id.clone(),
            contacts,
        };
        self.perform(session, order_id, UiAction::SendContacts, Some(&response_id), action)
            .await
    }

    /// Executor answers with their contacts (Response 2 → 3).
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn send_executor_contacts(&self, session: &Session, order_id: String, response_id: String) -> Result<Order, OrderError> {
        let contacts = self.live_contacts(session).await?;
        let action = OrderAction::SendExecutorContacts {
            response_id: response_id.clone(),
            contacts,
        };
        self.perform(session, order_id, UiAction::SendContacts, Some(&response_id), action)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn reject_response(&self, session: &Session, order_id: String, response_id: String) -> Result<Order, OrderError> {
        let action = OrderAction::RejectResponse {
            response_id: response_id.clone(),
        };
        self.perform(session, order_id, UiAction::RejectResponse, Some(&response_id), action)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn select_performer(&self, session: &Session, order_id: String, response_id: String) -> Result<Order, OrderError> {
        let action = OrderAction::SelectPerformer {
            response_id: response_id.clone(),
        };
        self.perform(session, order_id, UiAction::ChoosePerformer, Some(&response_id), action)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn respond_to_order(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::Respond, None, OrderAction::Respond)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn withdraw_response(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::WithdrawResponse, None, OrderAction::WithdrawResponse)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn reject_order(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::RejectOrder, None, OrderAction::RejectOrder)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn take_order(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::TakeOrder, None, OrderAction::TakeOrder)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn reject_performer(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::RejectPerformer, None, OrderAction::RejectPerformer)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn change_performer(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::ChangePerformer, None, OrderAction::ChangePerformer)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn return_to_search(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::ReturnToSearch, None, OrderAction::ReturnToSearch)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn complete_order(&self, session: &Session, order_id: String, outcome: CompletionOutcome) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::Complete, None, OrderAction::Complete { outcome })
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn confirm_completion(&self, session: &Session, order_id: String, accepted: bool) -> Result<Order, OrderError> {
        let gate = if accepted {
            UiAction::AcceptCompletion
        } else {
            UiAction::RejectCompletion
        };
        self.perform(session, order_id, gate, None, OrderAction::ConfirmCompletion { accepted })
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn cancel_order(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::CancelOrder, None, OrderAction::Cancel)
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn archive_order(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::Archive, None, OrderAction::Archive)
            .await
    }

    #[instrument(skip(self, session, text), fields(user_id = %session.user_id()))]
    pub async fn submit_review(&self, session: &Session, order_id: String, rating: u8, text: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::LeaveReview, None, OrderAction::SubmitReview { rating, text })
            .await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn advance_mediator_step(&self, session: &Session, order_id: String) -> Result<Order, OrderError> {
        self.perform(session, order_id, UiAction::AdvanceMediatorStep, None, OrderAction::AdvanceMediatorStep)
            .await
    }

    /// Copy of the session user's contacts as stored right now.
    async fn live_contacts(&self, session: &Session) -> Result<ContactBundle, OrderError> {
        let user = self.user_client.fetch_user(session.user_id().to_string()).await?;
        Ok(user.contacts)
    }

    /// Refuses `action` unless the freshly fetched order offers it to `session`.
    async fn gate(&self, session: &Session, order_id: &str, action: UiAction, response_id: Option<&str>) -> Result<Order, OrderError> {
        let order = self.fetch_order(order_id.to_string()).await?;
        if !order.available_actions_for(&session.caller(), response_id).contains(action) {
            warn!(order_id, action = %action, status = %order.status, "Action not available");
            return Err(OrderError::ActionNotAvailable {
                action,
                status: order.status,
            });
        }
        Ok(order)
    }

    async fn perform(
        &self,
        session: &Session,
        order_id: String,
        gate: UiAction,
        response_id: Option<&str>,
        action: OrderAction,
    ) -> Result<Order, OrderError> {
        self.gate(session, &order_id, gate, response_id).await?;

        debug!("Sending request");
        let command = OrderCommand {
            caller: session.caller(),
            action,
        };
        match self.inner.perform_action(order_id.clone(), command).await {
            Ok(result) => info!(result = ?result, "Action applied"),
            Err(e) => {
                error!(error = %e, "Action failed");
                return Err(e.into());
            }
        }

        self.fetch_order(order_id).await
    }
}
