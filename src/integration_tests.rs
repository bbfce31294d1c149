#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::app_system::{OrderSystem, SystemConfig};
    use crate::clients::{OrderClient, UserClient};
    use crate::domain::{
        CompletionOutcome, ContactBundle, Order, OrderCreate, Role, User, Workflow,
    };
    use crate::lifecycle::{
        ContactPanel, OrderStatus, ResponsePanel, ResponseStatus, SuccessCode, UiAction,
    };
    use crate::mock_framework::{
        create_mock_client, expect_action, expect_closed, expect_create, expect_get,
    };
    use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
    use crate::scope::ScreenScope;
    use crate::session::Session;
    use crate::view::OrderScreen;

    fn user(id: &str, role: Role, phone: &str) -> User {
        let mut user = User::new(id, role).with_contacts(ContactBundle {
            phone: Some(phone.into()),
            ..ContactBundle::default()
        });
        user.id = id.into();
        user
    }

    // ---------------------------------------------------------------------
    // Client orchestration against mocked actors
    // ---------------------------------------------------------------------

    #[tokio::test]
    async fn test_order_creation_flow() {
        let (user_inner, mut user_rx) = create_mock_client::<User>(10);
        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_inner, UserClient::new(user_inner));
        let session = Session::from_user(user("cust", Role::Customer, "+1"));

        let order_task = tokio::spawn(async move {
            order_client
                .create_order(&session, OrderCreate::direct("cust", "Hang shelves"))
                .await
        });

        let (user_id, responder) = expect_get(&mut user_rx).await.expect("Expected User Get");
        assert_eq!(user_id, "cust");
        responder.send(Ok(Some(user("cust", Role::Customer, "+1")))).unwrap();

        let (params, responder) = expect_create(&mut order_rx).await.expect("Expected Order Create");
        assert_eq!(params.author, "cust");
        assert_eq!(params.workflow, Workflow::Direct);
        assert!(params.mediator.is_none());
        responder.send(Ok("order_1".to_string())).unwrap();

        assert_eq!(order_task.await.unwrap(), Ok("order_1".to_string()));
    }

    #[tokio::test]
    async fn test_gated_action_is_never_sent() {
        let (user_inner, _user_rx) = create_mock_client::<User>(10);
        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_inner, UserClient::new(user_inner));
        let session = Session::from_user(user("cust", Role::Customer, "+1"));

        let task = tokio::spawn(async move { order_client.cancel_order(&session, "order_1".into()).await });

        let (id, responder) = expect_get(&mut order_rx).await.expect("Expected Order Get");
        let mut order = Order::new(id, "cust", "Paint");
        order.status = OrderStatus::InWork;
        responder.send(Ok(Some(order))).unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(OrderError::ActionNotAvailable {
                action: UiAction::CancelOrder,
                status: OrderStatus::InWork,
            })
        );
        // The client is gone and no action request ever arrived.
        assert!(expect_closed(&mut order_rx).await);
    }

    #[tokio::test]
    async fn test_action_then_refetch() {
        let (user_inner, _user_rx) = create_mock_client::<User>(10);
        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_inner, UserClient::new(user_inner));
        let session = Session::from_user(user("cust", Role::Customer, "+1"));

        let task = tokio::spawn(async move { order_client.cancel_order(&session, "order_1".into()).await });

        let (id, responder) = expect_get(&mut order_rx).await.expect("Expected gate Get");
        let order = Order::new(id, "cust", "Paint");
        responder.send(Ok(Some(order.clone()))).unwrap();

        let (id, command, responder) = expect_action(&mut order_rx).await.expect("Expected Order Action");
        assert_eq!(id, "order_1");
        assert!(matches!(command.action, OrderAction::Cancel));
        assert_eq!(command.caller.user_id, "cust");
        responder
            .send(Ok(OrderActionResult::Applied {
                status: OrderStatus::Cancelled,
            }))
            .unwrap();

        // The returned order is whatever the backend holds, not a local guess.
        let (_, responder) = expect_get(&mut order_rx).await.expect("Expected re-fetch Get");
        let mut stored = order;
        stored.status = OrderStatus::Cancelled;
        responder.send(Ok(Some(stored.clone()))).unwrap();

        assert_eq!(task.await.unwrap(), Ok(stored));
    }

    #[tokio::test]
    async fn test_backend_rejection_is_verbatim() {
        let (user_inner, _user_rx) = create_mock_client::<User>(10);
        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_inner, UserClient::new(user_inner));
        let session = Session::from_user(user("cust", Role::Customer, "+1"));

        let task = tokio::spawn(async move { order_client.cancel_order(&session, "order_1".into()).await });

        let (id, responder) = expect_get(&mut order_rx).await.expect("Expected gate Get");
        responder.send(Ok(Some(Order::new(id, "cust", "Paint")))).unwrap();
        let (_, _, responder) = expect_action(&mut order_rx).await.expect("Expected Order Action");
        responder
            .send(Err(crate::actor_framework::FrameworkError::Rejected(
                "Order order_1 cannot be cancelled in status in_work(4)".into(),
            )))
            .unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Order order_1 cannot be cancelled in status in_work(4)");
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_closed_screen_drops_late_result() {
        let (user_inner, _user_rx) = create_mock_client::<User>(10);
        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(order_inner, UserClient::new(user_inner));

        let scope = ScreenScope::new("order");
        let token = scope.token();
        let task = tokio::spawn(async move { scope.run(order_client.fetch_order("order_1".into())).await });

        // Backend receives the request but the user navigates away first.
        let (_, responder) = expect_get(&mut order_rx).await.expect("Expected Order Get");
        token.cancel();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let _ = responder.send(Ok(Some(Order::new("order_1", "cust", "Paint"))));

        assert_eq!(task.await.unwrap(), Err(OrderError::Cancelled));
    }

    // ---------------------------------------------------------------------
    // End to end through the running actors
    // ---------------------------------------------------------------------

    struct World {
        system: OrderSystem,
        customer: Session,
        executor: Session,
        rival: Session,
    }

    async fn world() -> World {
        let system = OrderSystem::new(&SystemConfig::default());
        let mut ids = Vec::new();
        for (name, role, phone) in [
            ("Carol", Role::Customer, "+100"),
            ("Eve", Role::Executor, "+200"),
            ("Rex", Role::Executor, "+300"),
        ] {
            let u = User::new(name, role).with_contacts(ContactBundle {
                phone: Some(phone.into()),
                ..ContactBundle::default()
            });
            ids.push(system.user_client.create_user(u).await.unwrap());
        }
        let customer = Session::login(&system.user_client, ids[0].clone()).await.unwrap();
        let executor = Session::login(&system.user_client, ids[1].clone()).await.unwrap();
        let rival = Session::login(&system.user_client, ids[2].clone()).await.unwrap();
        World {
            system,
            customer,
            executor,
            rival,
        }
    }

    /// Drives an order to Response 3 / Order 2 for `w.executor`.
    async fn exchanged(w: &World) -> (String, String) {
        let orders = &w.system.order_client;
        let order_id = orders
            .create_order(&w.customer, OrderCreate::direct(w.customer.user_id(), "Tile the bath"))
            .await
            .unwrap();
        let order = orders.respond_to_order(&w.executor, order_id.clone()).await.unwrap();
        let response_id = order.response_by_executor(w.executor.user_id()).unwrap().id.clone();
        orders
            .send_contacts(&w.customer, order_id.clone(), response_id.clone())
            .await
            .unwrap();
        let order = orders
            .send_executor_contacts(&w.executor, order_id.clone(), response_id.clone())
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::SelectingExecutor);
        (order_id, response_id)
    }

    #[tokio::test]
    async fn test_full_direct_lifecycle() {
        let w = world().await;
        let orders = &w.system.order_client;

        let order_id = orders
            .create_order(&w.customer, OrderCreate::direct(w.customer.user_id(), "Tile the bath"))
            .await
            .unwrap();
        let order = orders.respond_to_order(&w.executor, order_id.clone()).await.unwrap();
        let response_id = order.response_by_executor(w.executor.user_id()).unwrap().id.clone();
        assert_eq!(response_id, format!("{}_response_1", order_id));

        // Order 0, Response 0: customer may send contacts, not choose.
        let screen = OrderScreen::build(&order, &w.customer);
        assert!(screen.responses[0].actions.contains(UiAction::SendContacts));
        assert!(!screen.responses[0].actions.contains(UiAction::ChoosePerformer));
        assert_eq!(screen.responses[0].contacts, ContactPanel::Hidden);

        // Response 2: executor sees customer contacts and may answer.
        let order = orders
            .send_contacts(&w.customer, order_id.clone(), response_id.clone())
            .await
            .unwrap();
        let screen = OrderScreen::build(&order, &w.executor);
        assert_eq!(screen.response_panel, Some(ResponsePanel::ContactsPending));
        assert!(screen.actions.contains(UiAction::SendContacts));
        assert!(matches!(screen.counterpart, ContactPanel::Shown(_)));
        assert!(order.additional.executor_contacts.is_none());

        // Response 3, Order 2: customer may choose.
        let order = orders
            .send_executor_contacts(&w.executor, order_id.clone(), response_id.clone())
            .await
            .unwrap();
        let screen = OrderScreen::build(&order, &w.customer);
        assert!(screen.responses[0].actions.contains(UiAction::ChoosePerformer));
        let screen = OrderScreen::build(&order, &w.executor);
        assert_eq!(screen.response_panel, Some(ResponsePanel::SelectionEligible));

        let order = orders
            .select_performer(&w.customer, order_id.clone(), response_id.clone())
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::ExecutorSelected);
        assert_eq!(order.selected_performer.as_deref(), Some(w.executor.user_id()));
        assert_eq!(
            order.additional.executor_contacts.as_ref().and_then(|c| c.phone.as_deref()),
            Some("+200")
        );

        let order = orders.take_order(&w.executor, order_id.clone()).await.unwrap();
        assert_eq!(order.status, OrderStatus::InWork);

        // Customer finishes first: archive, not accept/reject.
        let order = orders
            .complete_order(&w.customer, order_id.clone(), CompletionOutcome::Success)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::InWork);
        let actions = order.available_actions_for(&w.customer.caller(), None);
        assert!(actions.contains(UiAction::Archive));
        assert!(!actions.contains(UiAction::AcceptCompletion));
        assert!(!actions.contains(UiAction::RejectCompletion));

        let order = orders
            .complete_order(&w.executor, order_id.clone(), CompletionOutcome::Success)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::AwaitingConfirmation);

        let order = orders
            .confirm_completion(&w.customer, order_id.clone(), true)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Closed(SuccessCode::Closed));

        let order = orders
            .submit_review(&w.customer, order_id.clone(), 5, "Great work".into())
            .await
            .unwrap();
        assert_eq!(order.reviews.len(), 1);

        let before = order.status;
        let order = orders.archive_order(&w.customer, order_id.clone()).await.unwrap();
        assert_eq!(order.status, before);
        assert!(order.customer_archived);
        assert!(!order.executor_archived);

        w.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_refused_once_work_started() {
        let w = world().await;
        let orders = &w.system.order_client;
        let (order_id, response_id) = exchanged(&w).await;
        orders
            .select_performer(&w.customer, order_id.clone(), response_id)
            .await
            .unwrap();
        orders.take_order(&w.executor, order_id.clone()).await.unwrap();

        let err = orders.cancel_order(&w.customer, order_id.clone()).await.unwrap_err();
        assert!(matches!(err, OrderError::ActionNotAvailable { action: UiAction::CancelOrder, .. }));
        assert_eq!(orders.fetch_order(order_id).await.unwrap().status, OrderStatus::InWork);
    }

    #[tokio::test]
    async fn test_selection_hides_sibling_responses() {
        let w = world().await;
        let orders = &w.system.order_client;
        let (order_id, response_id) = exchanged(&w).await;
        let order = orders.respond_to_order(&w.rival, order_id.clone()).await.unwrap();
        assert_eq!(order.responses.len(), 2);

        let order = orders
            .select_performer(&w.customer, order_id.clone(), response_id.clone())
            .await
            .unwrap();
        let screen = OrderScreen::build(&order, &w.customer);
        assert_eq!(screen.responses.len(), 1);
        assert_eq!(screen.responses[0].response_id, response_id);

        let screen = OrderScreen::build(&order, &w.rival);
        assert!(screen.actions.is_empty());
        assert_eq!(screen.counterpart, ContactPanel::Hidden);

        let err = orders.withdraw_response(&w.rival, order_id).await.unwrap_err();
        assert!(matches!(err, OrderError::ActionNotAvailable { .. }));
    }

    #[tokio::test]
    async fn test_change_performer_then_return_to_search() {
        let w = world().await;
        let orders = &w.system.order_client;
        let (order_id, response_id) = exchanged(&w).await;
        orders
            .select_performer(&w.customer, order_id.clone(), response_id.clone())
            .await
            .unwrap();

        let order = orders.change_performer(&w.customer, order_id.clone()).await.unwrap();
        assert_eq!(order.status, OrderStatus::SelectingExecutor);
        assert!(order.selected_performer.is_none());
        assert!(order.additional.executor_contacts.is_none());
        assert_eq!(order.response(&response_id).unwrap().status, ResponseStatus::Rejected);

        // A second executor goes all the way into work, then the customer resets.
        let order = orders.respond_to_order(&w.rival, order_id.clone()).await.unwrap();
        let rival_response = order.response_by_executor(w.rival.user_id()).unwrap().id.clone();
        orders
            .send_contacts(&w.customer, order_id.clone(), rival_response.clone())
            .await
            .unwrap();
        orders
            .send_executor_contacts(&w.rival, order_id.clone(), rival_response.clone())
            .await
            .unwrap();
        orders
            .select_performer(&w.customer, order_id.clone(), rival_response)
            .await
            .unwrap();
        orders.take_order(&w.rival, order_id.clone()).await.unwrap();

        let order = orders.return_to_search(&w.customer, order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::SearchExecutor);
        assert!(order.selected_performer.is_none());
        assert!(order.selected_response().is_none());
    }

    #[tokio::test]
    async fn test_contacts_are_copied_at_send_time() {
        let w = world().await;
        let orders = &w.system.order_client;
        let (order_id, response_id) = exchanged(&w).await;

        let changed = ContactBundle {
            email: Some("new@example.com".into()),
            ..ContactBundle::default()
        };
        w.system
            .user_client
            .update_contacts(w.executor.user_id().to_string(), changed)
            .await
            .unwrap();

        let order = orders.fetch_order(order_id).await.unwrap();
        let stored = order.response(&response_id).unwrap().executor_contacts.clone().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("+200"));
        assert!(stored.email.is_none());
    }

    #[tokio::test]
    async fn test_mediated_workflow() {
        let w = world().await;
        let mediator = user("ignored", Role::Mediator, "+900");
        let mediator_id = w.system.user_client.create_user(mediator).await.unwrap();
        let mediator = Session::login(&w.system.user_client, mediator_id).await.unwrap();
        let orders = &w.system.order_client;

        let mut params = OrderCreate::direct(w.customer.user_id(), "Move house");
        params.workflow = Workflow::Mediated;
        let order_id = orders.create_order(&mediator, params).await.unwrap();

        let order = orders.fetch_order(order_id.clone()).await.unwrap();
        assert_eq!(order.status, OrderStatus::MediatorStep1);
        assert!(order.is_performer(mediator.user_id()));
        let screen = OrderScreen::build(&order, &w.customer);
        assert!(matches!(screen.counterpart, ContactPanel::Shown(_)));
        assert_eq!(
            order.additional.customer_contacts.as_ref().and_then(|c| c.phone.as_deref()),
            Some("+100")
        );
        let screen = OrderScreen::build(&order, &mediator);
        let ContactPanel::Shown(entries) = &screen.counterpart else {
            panic!("mediator should see the customer: {:?}", screen.counterpart);
        };
        assert_eq!(entries[0].value, "+100");

        // Executors cannot respond to mediated orders.
        let err = orders.respond_to_order(&w.executor, order_id.clone()).await.unwrap_err();
        assert!(matches!(err, OrderError::ActionNotAvailable { .. }));

        for expected in [
            OrderStatus::MediatorStep2,
            OrderStatus::MediatorStep3,
            OrderStatus::MediatorArchived,
        ] {
            let order = orders.advance_mediator_step(&mediator, order_id.clone()).await.unwrap();
            assert_eq!(order.status, expected);
        }
        let err = orders.advance_mediator_step(&mediator, order_id).await.unwrap_err();
        assert!(matches!(err, OrderError::ActionNotAvailable { .. }));
    }

    #[tokio::test]
    async fn test_customer_cannot_open_order_for_someone_else() {
        let w = world().await;
        let err = w
            .system
            .order_client
            .create_order(&w.executor, OrderCreate::direct(w.customer.user_id(), "Sneaky"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));

        let err = w
            .system
            .order_client
            .create_order(&w.customer, OrderCreate::direct(w.executor.user_id(), "Wrong author"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidUser(_)));
    }
}
