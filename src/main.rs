use tracing::{error, info, Instrument};

use order_lifecycle::app_system::{setup_tracing, OrderSystem, SystemConfig};
use order_lifecycle::domain::{CompletionOutcome, ContactBundle, OrderCreate, Role, User};
use order_lifecycle::scope::ScreenScope;
use order_lifecycle::session::Session;
use order_lifecycle::view::OrderView;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = SystemConfig::from_env().map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.logging);

    info!("Starting order lifecycle demo");

    // Create the entire system (starts all actors)
    let system = OrderSystem::new(&config);

    let span = tracing::info_span!("user_creation");
    let (customer_id, executor_id) = async {
        info!("Creating demo users");
        let customer = User::new("Alice", Role::Customer).with_contacts(ContactBundle {
            phone: Some("+1 555 0100".into()),
            email: Some("alice@example.com".into()),
            ..ContactBundle::default()
        });
        let executor = User::new("Bob", Role::Executor).with_contacts(ContactBundle {
            telegram: Some("@bob_fixes".into()),
            ..ContactBundle::default()
        });
        let customer_id = system.user_client.create_user(customer).await?;
        let executor_id = system.user_client.create_user(executor).await?;
        Ok::<_, order_lifecycle::user_actor::UserError>((customer_id, executor_id))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let customer = Session::login(&system.user_client, customer_id.clone())
        .await
        .map_err(|e| e.to_string())?;
    let executor = Session::login(&system.user_client, executor_id)
        .await
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("order_lifecycle");
    let result = async {
        let orders = &system.order_client;
        let order_id = orders
            .create_order(&customer, OrderCreate::direct(customer_id, "Fix the kitchen tap"))
            .await?;

        let order = orders.respond_to_order(&executor, order_id.clone()).await?;
        let response_id = order
            .response_by_executor(executor.user_id())
            .map(|r| r.id.clone())
            .ok_or_else(|| order_lifecycle::order_actor::OrderError::ResponseNotFound(order_id.clone()))?;

        orders.send_contacts(&customer, order_id.clone(), response_id.clone()).await?;
        orders
            .send_executor_contacts(&executor, order_id.clone(), response_id.clone())
            .await?;
        orders.select_performer(&customer, order_id.clone(), response_id).await?;
        orders.take_order(&executor, order_id.clone()).await?;

        let scope = ScreenScope::new("order");
        let order = scope.run(orders.fetch_order(order_id.clone())).await?;
        if let Some(screen) = OrderView::build(Some(&order), &customer).screen() {
            info!(status = %screen.status, contacts = ?screen.counterpart, "Customer view");
        }

        orders
            .complete_order(&executor, order_id.clone(), CompletionOutcome::Success)
            .await?;
        orders
            .complete_order(&customer, order_id.clone(), CompletionOutcome::Success)
            .await?;
        orders.confirm_completion(&customer, order_id.clone(), true).await?;
        orders
            .submit_review(&customer, order_id.clone(), 5, "Quick and tidy".into())
            .await?;
        let order = orders.archive_order(&customer, order_id).await?;
        Ok::<_, order_lifecycle::order_actor::OrderError>(order)
    }
    .instrument(span)
    .await;

    match result {
        Ok(order) => info!(order_id = %order.id, status = %order.status, "Order lifecycle finished"),
        Err(e) => error!(error = %e, "Order lifecycle failed"),
    }

    customer.logout();
    executor.logout();

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
