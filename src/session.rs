//! Explicit application context.
//!
//! A [`Session`] is created at login and consumed at logout. Clients take it
//! as an argument instead of reading ambient global state.

use tracing::{info, instrument};

use crate::clients::UserClient;
use crate::domain::{Caller, Role, User};
use crate::user_actor::UserError;

#[derive(Debug, Clone)]
pub struct Session {
    user: User,
}

impl Session {
    /// Loads the user's profile and opens a session for them.
    #[instrument(skip(users))]
    pub async fn login(users: &UserClient, user_id: String) -> Result<Self, UserError> {
        let user = users.fetch_user(user_id).await?;
        info!(user_name = %user.name, role = ?user.role, "Session opened");
        Ok(Self { user })
    }

    pub fn from_user(user: User) -> Self {
        Self { user }
    }

    /// Re-reads the profile, e.g. after the user edited their contacts.
    pub async fn refresh(&mut self, users: &UserClient) -> Result<(), UserError> {
        self.user = users.fetch_user(self.user.id.clone()).await?;
        Ok(())
    }

    pub fn logout(self) {
        info!(user_id = %self.user.id, "Session closed");
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn caller(&self) -> Caller {
        self.user.caller()
    }
}
