use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    /// Creates a new User from creation parameters.
    ///
    /// # Errors
    /// Rejects blank names.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("User name must not be empty".to_string());
        }
        Ok(Self {
            id,
            name: params.name,
            role: params.role,
            contacts: params.contacts,
        })
    }

    /// Updates the user's profile information.
    ///
    /// # Fields Updated
    /// - `name`: User's display name
    /// - `contacts`: the live contact bundle. Orders keep their own copies,
    ///   so this never changes what an order already exchanged.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err("User name must not be empty".to_string());
            }
            self.name = name;
        }
        if let Some(contacts) = patch.contacts {
            self.contacts = contacts;
        }
        Ok(())
    }

    /// Handles user-specific actions.
    ///
    /// Currently, no custom actions are defined for users.
    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
