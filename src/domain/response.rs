use serde::{Deserialize, Serialize};

use super::contacts::ContactBundle;
use super::user::Role;
use crate::lifecycle::ResponseStatus;

/// One executor's (or mediator's) response to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    pub order_id: String,
    pub executor: String,
    pub executor_role: Role,
    pub status: ResponseStatus,
    /// Copied from the customer's profile when the customer sends contacts.
    pub customer_contacts: Option<ContactBundle>,
    /// Copied from the executor's profile when the executor sends contacts back.
    pub executor_contacts: Option<ContactBundle>,
}

impl Response {
    pub fn new(
        id: impl Into<String>,
        order_id: impl Into<String>,
        executor: impl Into<String>,
        executor_role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            order_id: order_id.into(),
            executor: executor.into(),
            executor_role,
            status: ResponseStatus::New,
            customer_contacts: None,
            executor_contacts: None,
        }
    }

    /// Moves to `next`, enforcing the response lifecycle.
    pub fn advance(&mut self, next: ResponseStatus) -> Result<(), String> {
        self.status
            .validate_transition(next)
            .map_err(|e| e.to_string())?;
        self.status = next;
        Ok(())
    }
}
