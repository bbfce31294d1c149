use serde::{Deserialize, Serialize};

use super::contacts::ContactBundle;

/// Marketplace role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Executor,
    Mediator,
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub contacts: ContactBundle,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub role: Role,
    pub contacts: ContactBundle,
}

/// Payload for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub contacts: Option<ContactBundle>,
}

/// Identity attached to every order command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl User {
    /// Creates a new User instance.
    ///
    /// # Notes
    /// The `id` field is initialized as an empty string and will be set by the actor system.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            role,
            contacts: ContactBundle::default(),
        }
    }

    pub fn with_contacts(mut self, contacts: ContactBundle) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.id.clone(),
            role: self.role,
        }
    }
}
