//! Test doubles for the resource actors.
//!
//! [`create_mock_client`] hands out a real [`ResourceClient`] whose requests
//! land on a receiver owned by the test. The `expect_*` helpers pop the next
//! request, check its kind, and return the payload with its reply channel so
//! the test can play the backend's part.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};

pub type MockReceiver<T> = mpsc::Receiver<ResourceRequest<T>>;

pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, MockReceiver<T>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

pub async fn expect_create<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::CreateParams, Response<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

pub async fn expect_get<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_update<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, T::Patch, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

pub async fn expect_action<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// True when nothing else was sent and every client handle is gone.
pub async fn expect_closed<T: Entity>(receiver: &mut MockReceiver<T>) -> bool {
    receiver.recv().await.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactBundle, Role, User, UserCreate, UserPatch};

    #[tokio::test]
    async fn test_mock_client_create() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move {
            let params = UserCreate {
                name: "Test".to_string(),
                role: Role::Executor,
                contacts: ContactBundle::default(),
            };
            client.create(params).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "Test");
        assert_eq!(params.role, Role::Executor);
        responder.send(Ok("user_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("user_1".to_string()));
        assert!(expect_closed(&mut receiver).await);
    }

    #[tokio::test]
    async fn test_mock_client_update() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let task = tokio::spawn(async move {
            let patch = UserPatch {
                name: Some("Renamed".into()),
                contacts: None,
            };
            client.update("user_7".into(), patch).await
        });

        let (id, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, "user_7");
        assert_eq!(patch.name.as_deref(), Some("Renamed"));
        let mut user = User::new("Renamed", Role::Customer);
        user.id = id;
        responder.send(Ok(user.clone())).unwrap();

        assert_eq!(task.await.unwrap(), Ok(user));
    }
}
