//! Screen view model derived from an authoritative [`Order`].
//!
//! Nothing here talks to the backend. Screens re-derive the view from every
//! re-fetched order so gating and visibility always follow stored state.

use crate::domain::{Order, Response, Role, User, Workflow};
use crate::lifecycle::{
    contact_panel, contact_visibility, ActionSet, ContactPanel, OrderStatus, ResponsePanel,
    VisibilityContext,
};
use crate::session::Session;

/// What the order screen renders.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderView {
    /// The order could not be loaded; render a placeholder.
    Missing,
    Loaded(OrderScreen),
}

impl OrderView {
    pub fn build(order: Option<&Order>, session: &Session) -> Self {
        match order {
            Some(order) => OrderView::Loaded(OrderScreen::build(order, session)),
            None => OrderView::Missing,
        }
    }

    pub fn screen(&self) -> Option<&OrderScreen> {
        match self {
            OrderView::Loaded(screen) => Some(screen),
            OrderView::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderScreen {
    pub order_id: String,
    pub status: OrderStatus,
    /// Order-level actions for the session user.
    pub actions: ActionSet,
    /// The other side's contacts at order level.
    pub counterpart: ContactPanel,
    /// Executor and mediator view of their own response.
    pub response_panel: Option<ResponsePanel>,
    /// Customer view of the responses still worth acting on.
    pub responses: Vec<ResponseCard>,
}

/// One response as the customer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCard {
    pub response_id: String,
    pub executor: String,
    pub panel: ResponsePanel,
    pub actions: ActionSet,
    pub contacts: ContactPanel,
}

impl OrderScreen {
    pub fn build(order: &Order, session: &Session) -> Self {
        let caller = session.caller();
        let snapshot = order.additional.executor_contacts.as_ref();
        let snapshot_present = snapshot.is_some_and(|c| !c.is_empty());

        match caller.role {
            Role::Customer => {
                let selected = order.selected_response();
                let ctx = VisibilityContext {
                    viewer: Role::Customer,
                    response: selected.map(|r| r.status),
                    order: Some(order.status),
                    snapshot_present,
                };
                let counterpart = if order.status.allows_performer() {
                    contact_panel(contact_visibility(&ctx), snapshot)
                } else {
                    ContactPanel::Hidden
                };
                let responses = if order.is_author(&caller.user_id) {
                    order
                        .actionable_responses()
                        .into_iter()
                        .map(|r| ResponseCard::build(order, session, r))
                        .collect()
                } else {
                    Vec::new()
                };

                Self {
                    order_id: order.id.clone(),
                    status: order.status,
                    actions: order.available_actions_for(&caller, None),
                    counterpart,
                    response_panel: None,
                    responses,
                }
            }
            Role::Executor | Role::Mediator => {
                let own = order.response_by_executor(&caller.user_id);
                let ctx = VisibilityContext {
                    viewer: caller.role,
                    response: own.map(|r| r.status),
                    order: Some(order.status),
                    snapshot_present,
                };
                let bundle = match own {
                    Some(r) => r.customer_contacts.as_ref(),
                    // The mediator of a mediated order has no response of their own.
                    None if order.workflow == Workflow::Mediated && order.is_performer(&caller.user_id) => {
                        order.additional.customer_contacts.as_ref()
                    }
                    None => None,
                };
                let counterpart = if own.is_some() || order.is_performer(&caller.user_id) {
                    contact_panel(contact_visibility(&ctx), bundle)
                } else {
                    ContactPanel::Hidden
                };

                Self {
                    order_id: order.id.clone(),
                    status: order.status,
                    actions: order.available_actions_for(&caller, None),
                    counterpart,
                    response_panel: Some(ResponsePanel::for_status(own.map(|r| r.status))),
                    responses: Vec::new(),
                }
            }
        }
    }
}

impl ResponseCard {
    fn build(order: &Order, session: &Session, response: &Response) -> Self {
        let ctx = VisibilityContext {
            viewer: Role::Customer,
            response: Some(response.status),
            order: Some(order.status),
            snapshot_present: order
                .additional
                .executor_contacts
                .as_ref()
                .is_some_and(|c| !c.is_empty()),
        };
        let bundle = if order.status.is_post_selection() {
            order.additional.executor_contacts.as_ref()
        } else {
            response.executor_contacts.as_ref()
        };

        Self {
            response_id: response.id.clone(),
            executor: response.executor.clone(),
            panel: ResponsePanel::for_status(Some(response.status)),
            actions: order.available_actions_for(&session.caller(), Some(&response.id)),
            contacts: contact_panel(contact_visibility(&ctx), bundle),
        }
    }
}

/// Contacts shown on a profile screen reached without any order context.
pub fn profile_contacts(viewer: Role, user: &User) -> ContactPanel {
    let visibility = contact_visibility(&VisibilityContext::without_order(viewer));
    contact_panel(visibility, Some(&user.contacts))
}
