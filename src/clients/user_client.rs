use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{ContactBundle, User, UserCreate, UserPatch};
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    // Custom create method as it needs specific payload conversion

    #[instrument(skip(self, user), fields(user_name = %user.name, role = ?user.role))]
    pub async fn create_user(&self, user: User) -> Result<String, UserError> {
        debug!("Sending request");
        let params = UserCreate {
            name: user.name,
            role: user.role,
            contacts: user.contacts,
        };
        let id = self.inner.create(params).await?;
        info!(user_id = %id, "User created");
        Ok(id)
    }

    /// Replaces the live contact bundle. Orders that already exchanged
    /// contacts keep their own copies.
    #[instrument(skip(self, contacts))]
    pub async fn update_contacts(&self, id: String, contacts: ContactBundle) -> Result<User, UserError> {
        debug!("Sending request");
        let patch = UserPatch {
            name: None,
            contacts: Some(contacts),
        };
        Ok(self.inner.update(id, patch).await?)
    }
}
