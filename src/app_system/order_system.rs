use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use super::config::SystemConfig;
use crate::actor_framework::ResourceActor;
use crate::clients::{OrderClient, UserClient};
use crate::domain::{Order, User};

fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// The application system that owns the backend actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub user_client: UserClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    pub fn new(config: &SystemConfig) -> Self {
        let buffer_size = config.actors.buffer_size;

        // 1. Users
        let (user_actor, user_resource_client) =
            ResourceActor::<User>::new("users", buffer_size, id_sequence("user"));
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Orders, which read user profiles for validation and contact copies
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new("orders", buffer_size, id_sequence("order"));
        let order_client = OrderClient::new(order_resource_client, user_client.clone());
        let order_handle = tokio::spawn(order_actor.run());

        info!(buffer_size, "Order system started");
        Self {
            order_client,
            user_client,
            handles: vec![user_handle, order_handle],
        }
    }

    /// Drops the clients so each actor sees its channel close, then waits
    /// for the actor tasks. Clones held elsewhere keep their actor alive.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.order_client);
        drop(self.user_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
