use super::*;

#[test]
fn test_create_order_prices_server_side() {
    let h = create_harness(ten_percent_tax());
    let order = h.place_order();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.version, 1);
    assert_eq!(order.subtotal, dec("250"));
    assert_eq!(order.tax_amount, dec("25.00"));
    assert_eq!(order.total, dec("275.00"));
    assert_eq!(order.tax_rate, dec("0.10"));
    assert_eq!(order.session_id.as_deref(), Some("ses_a"));
    assert_eq!(order.special_instructions.as_deref(), Some("no onions"));
    assert_eq!(order.estimated_prep_minutes, 16);

    let table = h.table_now();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.current_order_id.as_deref(), Some(order.id.as_str()));
    assert_eq!(table.version, 2);

    let timeline = h.manager.timeline(&h.guest(), &order.id).unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].from, None);
    assert_eq!(timeline[0].to, OrderStatus::Pending);
}

#[test]
fn test_rates_captured_at_creation() {
    let h = create_harness(ten_percent_tax());
    let order = h.place_order();

    let manager_ctx = h.staff(StaffRole::Manager);
    h.directory
        .update_settings(
            &manager_ctx,
            TenantSettings {
                tax_rate: dec("0.20"),
                ..Default::default()
            },
        )
        .unwrap();

    let reloaded = h.manager.get_order(&manager_ctx, &order.id).unwrap();
    assert_eq!(reloaded.tax_rate, dec("0.10"));
    assert_eq!(reloaded.total, dec("275.00"));
}

#[test]
fn test_second_order_on_occupied_table_rejected() {
    let h = create_harness(TenantSettings::default());
    let first = h.place_order();

    let err = h
        .manager
        .create_order(&h.guest_session("ses_b"), &pizza_and_steak())
        .unwrap_err();
    match err {
        OrderError::TableOccupied { order_id, .. } => assert_eq!(order_id, first.id),
        other => panic!("expected TableOccupied, got {other:?}"),
    }
}

#[test]
fn test_table_freed_after_completion_allows_new_order() {
    let h = create_harness(TenantSettings::default());
    let order = h.place_order();
    for target in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        h.advance(&order, target);
    }

    let table = h.table_now();
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.current_order_id.is_none());
    assert!(h.manager.create_order(&h.guest(), &pizza_and_steak()).is_ok());
}

#[test]
fn test_tenant_capacity_limit() {
    let h = create_harness(TenantSettings {
        max_concurrent_orders: Some(1),
        ..Default::default()
    });
    let second_table = h.directory.add_table(&h.tenant.id, 6).unwrap();
    h.place_order();

    let guest = AccessContext::guest(&h.tenant.id, &second_table.id, "ses_b");
    let err = h
        .manager
        .create_order(&guest, &pizza_and_steak())
        .unwrap_err();
    assert!(matches!(err, OrderError::TenantAtCapacity { limit: 1 }));
    assert_eq!(
        h.storage
            .get_table(&second_table.id)
            .unwrap()
            .unwrap()
            .status,
        TableStatus::Available
    );
}

#[test]
fn test_invalid_item_leaves_no_trace() {
    let h = create_harness(TenantSettings::default());
    let req = CreateOrderRequest {
        table_id: None,
        items: vec![item("pizza", 1), item("ghost", 1)],
        special_instructions: None,
    };
    let err = h.manager.create_order(&h.guest(), &req).unwrap_err();
    assert!(matches!(err, OrderError::InvalidItem { index: 1, .. }));
    assert_eq!(h.table_now().status, TableStatus::Available);
    assert!(h
        .manager
        .active_orders(&h.staff(StaffRole::Service))
        .unwrap()
        .is_empty());
}

#[test]
fn test_guest_orders_only_for_own_table() {
    let h = create_harness(TenantSettings::default());
    let other = h.directory.add_table(&h.tenant.id, 9).unwrap();
    let req = CreateOrderRequest {
        table_id: Some(other.id.clone()),
        ..pizza_and_steak()
    };
    let err = h.manager.create_order(&h.guest(), &req).unwrap_err();
    assert!(matches!(err, OrderError::Auth(AuthError::Denied { .. })));
}

#[test]
fn test_staff_must_name_a_table() {
    let h = create_harness(TenantSettings::default());
    let staff = h.staff(StaffRole::Service);
    let err = h
        .manager
        .create_order(&staff, &pizza_and_steak())
        .unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));

    let req = CreateOrderRequest {
        table_id: Some(h.table.id.clone()),
        ..pizza_and_steak()
    };
    let order = h.manager.create_order(&staff, &req).unwrap();
    assert!(order.session_id.is_none());
}

#[test]
fn test_inactive_tenant_cannot_order() {
    let h = create_harness(TenantSettings::default());
    h.directory
        .set_active(&h.staff(StaffRole::Owner), false)
        .unwrap();
    let err = h
        .manager
        .create_order(&h.guest(), &pizza_and_steak())
        .unwrap_err();
    assert!(matches!(err, OrderError::TenantInactive(_)));
}

#[test]
fn test_cross_tenant_access_rejected() {
    let h = create_harness(TenantSettings::default());
    let order = h.place_order();
    let outsider = AccessContext::staff("ten_other", "stf_x", StaffRole::Owner, &[]);

    assert!(matches!(
        h.manager.get_order(&outsider, &order.id),
        Err(OrderError::Auth(AuthError::TenantMismatch { .. }))
    ));
    assert!(matches!(
        h.manager
            .transition_status(&outsider, &order.id, OrderStatus::Confirmed, None),
        Err(OrderError::Auth(AuthError::TenantMismatch { .. }))
    ));
    assert!(matches!(
        h.manager
            .set_table_status(&outsider, &h.table.id, TableStatus::Cleaning),
        Err(OrderError::Auth(AuthError::TenantMismatch { .. }))
    ));
}

#[test]
fn test_guest_reads_only_own_table() {
    let h = create_harness(TenantSettings::default());
    let order = h.place_order();
    let other = h.directory.add_table(&h.tenant.id, 7).unwrap();
    let neighbour = AccessContext::guest(&h.tenant.id, &other.id, "ses_n");

    assert!(h.manager.get_order(&h.guest_session("ses_z"), &order.id).is_ok());
    assert!(matches!(
        h.manager.get_order(&neighbour, &order.id),
        Err(OrderError::OrderNotFound(_))
    ));
    assert!(matches!(
        h.manager.order_for_table(&neighbour, &h.table.id),
        Err(OrderError::Auth(AuthError::Denied { .. }))
    ));
    assert!(matches!(
        h.manager.active_orders(&neighbour),
        Err(OrderError::Auth(AuthError::Denied { .. }))
    ));

    let current = h.manager.order_for_table(&h.guest(), &h.table.id).unwrap();
    assert_eq!(current.map(|o| o.id), Some(order.id));
}

#[test]
fn test_annotate_bumps_version_without_status_change() {
    let h = create_harness(TenantSettings::default());
    let order = h.place_order();
    let staff = h.staff(StaffRole::Service);

    let noted = h
        .manager
        .annotate(&staff, &order.id, "nut allergy at seat 2")
        .unwrap();
    assert_eq!(noted.version, 2);
    assert_eq!(noted.status, OrderStatus::Pending);
    assert_eq!(noted.notes.len(), 1);
    assert_eq!(noted.notes[0].staff_id, "stf_1");
    assert_eq!(h.manager.timeline(&staff, &order.id).unwrap().len(), 1);

    assert!(matches!(
        h.manager.annotate(&h.guest(), &order.id, "hello"),
        Err(OrderError::Auth(AuthError::Denied { .. }))
    ));
    assert!(matches!(
        h.manager.annotate(&staff, &order.id, "   "),
        Err(OrderError::Validation(_))
    ));
}

#[test]
fn test_table_override_blocked_while_occupied() {
    let h = create_harness(TenantSettings::default());
    let staff = h.staff(StaffRole::Service);

    let cleaning = h
        .manager
        .set_table_status(&staff, &h.table.id, TableStatus::Cleaning)
        .unwrap();
    assert_eq!(cleaning.status, TableStatus::Cleaning);
    assert_eq!(cleaning.version, 2);
    h.manager
        .set_table_status(&staff, &h.table.id, TableStatus::Available)
        .unwrap();

    h.place_order();
    let err = h
        .manager
        .set_table_status(&staff, &h.table.id, TableStatus::Available)
        .unwrap_err();
    assert!(matches!(err, OrderError::TableOccupied { .. }));
    assert_eq!(h.table_now().status, TableStatus::Occupied);

    assert!(matches!(
        h.manager
            .set_table_status(&h.guest(), &h.table.id, TableStatus::Cleaning),
        Err(OrderError::Auth(AuthError::Denied { .. }))
    ));
}

#[tokio::test]
async fn test_committed_changes_are_published() {
    let h = create_harness(TenantSettings::default());
    let kitchen = h.staff(StaffRole::Kitchen);
    let mut sub = h
        .bus
        .subscribe(
            &kitchen,
            SubscriptionScope::Tenant {
                tenant_id: h.tenant.id.clone(),
            },
        )
        .unwrap();

    let order = h.place_order();
    h.manager
        .transition_status(&kitchen, &order.id, OrderStatus::Confirmed, None)
        .unwrap();

    let created = sub.recv().await.unwrap();
    assert_eq!(created.payload.name(), "ORDER_CREATED");
    assert_eq!(created.sequence, 1);
    let table = sub.recv().await.unwrap();
    assert_eq!(table.payload.name(), "TABLE_STATUS_CHANGED");
    let changed = sub.recv().await.unwrap();
    assert_eq!(changed.sequence, 2);
    match changed.payload {
        EventPayload::StatusChanged { from, to, .. } => {
            assert_eq!(from, OrderStatus::Pending);
            assert_eq!(to, OrderStatus::Confirmed);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_denied_transition_leaves_order_untouched() {
    let h = create_harness(TenantSettings::default());
    let order = h.place_order();
    let service = h.staff(StaffRole::Service);
    let _ = h
        .manager
        .transition_status(&service, &order.id, OrderStatus::Confirmed, None);
    let stored = h.storage.get_order(&order.id).unwrap().unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.status, OrderStatus::Pending);
}
