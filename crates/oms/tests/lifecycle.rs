//! End-to-end notification traces against a single manager.

use ox_core::config::{OmsConfig, ReplaceKeying};
use ox_core::types::*;
use ox_oms::{Listener, Notification, NotificationKind, OrderError, OrderManager, OrderState};

fn units(v: i64) -> Price {
    Price::from_units(v)
}

/// Buy 10 @ 200, partially filled, then a +2 replace overtaken by fills.
#[test]
fn test_fills_ahead_of_pending_replace() {
    let mut mgr = OrderManager::new();
    let id = OrderId(100);

    mgr.on_insert_order_request(id, Side::Buy, units(200), 10);
    mgr.on_request_acknowledged(id);
    {
        let order = mgr.get_order(&id).unwrap();
        assert_eq!(order.state(), OrderState::Active);
        assert_eq!(mgr.confirmed_order_value(Side::Buy), units(2000));
    }

    mgr.on_order_filled(id, 5);
    {
        let order = mgr.get_order(&id).unwrap();
        assert_eq!(order.filled_quantity(), 5);
        assert_eq!(order.remaining_quantity(), 5);
        assert_eq!(order.state(), OrderState::PartiallyFilled);
        assert_eq!(mgr.net_filled_quantity(), 5);
        assert_eq!(mgr.confirmed_order_value(Side::Buy), units(1000));
    }

    mgr.on_replace_order_request(id, OrderId(101), 2);
    assert_eq!(mgr.get_order(&id).unwrap().state(), OrderState::ReplacePending);
    assert_eq!(mgr.confirmed_order_value(Side::Buy), units(0));

    mgr.on_order_filled(id, 5);
    {
        let order = mgr.get_order(&id).unwrap();
        assert_eq!(order.filled_quantity(), 10);
        assert_eq!(order.remaining_quantity(), 0);
        assert_eq!(order.state(), OrderState::ReplacePending);
        assert_eq!(mgr.net_filled_quantity(), 10);
        assert_eq!(mgr.confirmed_order_value(Side::Buy), units(-1000));
    }

    mgr.on_order_filled(id, 1);
    {
        let order = mgr.get_order(&id).unwrap();
        assert_eq!(order.filled_quantity(), 11);
        assert_eq!(order.remaining_quantity(), -1);
        assert_eq!(order.state(), OrderState::ReplacePending);
        assert_eq!(mgr.net_filled_quantity(), 11);
        assert_eq!(mgr.confirmed_order_value(Side::Buy), units(-1200));
    }

    mgr.on_request_acknowledged(id);
    let order = mgr.get_order(&OrderId(101)).unwrap();
    assert_eq!(order.id(), OrderId(101));
    assert_eq!(order.total_quantity(), 12);
    assert_eq!(order.remaining_quantity(), 1);
    assert_eq!(order.state(), OrderState::PartiallyFilled);
    assert!(mgr.pending_replace(&id).is_none());

    assert_eq!(mgr.net_filled_quantity(), 11);
    assert_eq!(mgr.confirmed_order_value(Side::Buy), units(-1000));
    assert!(mgr.confirmed_order_value(Side::Sell).is_zero());
    assert!(mgr.take_diagnostics().is_empty());
}

/// Same trace with the legacy keying: the order stays under its first id.
#[test]
fn test_fills_ahead_of_pending_replace_retained_key() {
    let mut mgr = OrderManager::with_config(&OmsConfig {
        replace_keying: ReplaceKeying::Retain,
        ..OmsConfig::default()
    });
    let id = OrderId(100);
    let trace = [
        Notification::InsertOrderRequest {
            id,
            side: Side::Buy,
            price: units(200),
            quantity: 10,
        },
        Notification::RequestAcknowledged { id },
        Notification::OrderFilled {
            id,
            quantity_filled: 5,
        },
        Notification::ReplaceOrderRequest {
            old_id: id,
            new_id: OrderId(101),
            delta_quantity: 2,
        },
        Notification::OrderFilled {
            id,
            quantity_filled: 5,
        },
        Notification::OrderFilled {
            id,
            quantity_filled: 1,
        },
        Notification::RequestAcknowledged { id },
    ];
    for n in &trace {
        n.deliver(&mut mgr);
    }

    let order = mgr.get_order(&id).unwrap();
    assert_eq!(order.id(), OrderId(101));
    assert_eq!(order.remaining_quantity(), 1);
    assert_eq!(order.state(), OrderState::PartiallyFilled);
    assert!(mgr.get_order(&OrderId(101)).is_none());
    assert_eq!(mgr.net_filled_quantity(), 11);
    assert_eq!(mgr.confirmed_order_value(Side::Buy), units(-1000));
}

#[test]
fn test_boundary_cases_are_reported_and_dropped() {
    let mut mgr = OrderManager::new();
    mgr.on_insert_order_request(OrderId(1), Side::Sell, units(50), 4);
    mgr.on_request_acknowledged(OrderId(1));
    mgr.on_insert_order_request(OrderId(2), Side::Buy, units(20), 3);
    mgr.on_request_rejected(OrderId(2));
    let before = mgr.exposure().clone();

    // Duplicate insert.
    mgr.on_insert_order_request(OrderId(1), Side::Buy, units(1), 1);
    // Replace while a replace is already pending.
    mgr.on_replace_order_request(OrderId(1), OrderId(10), 1);
    let after_first_replace = mgr.exposure().clone();
    mgr.on_replace_order_request(OrderId(1), OrderId(11), 2);
    // Fill on a rejected order.
    mgr.on_order_filled(OrderId(2), 1);
    // Unknown ids.
    mgr.on_request_acknowledged(OrderId(99));
    mgr.on_request_rejected(OrderId(98));

    let diagnostics = mgr.take_diagnostics();
    let summary: Vec<_> = diagnostics
        .iter()
        .map(|d| (d.notification, d.error.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                NotificationKind::InsertOrderRequest,
                OrderError::DuplicateOrder(OrderId(1))
            ),
            (
                NotificationKind::ReplaceOrderRequest,
                OrderError::AlreadyPending {
                    order_id: OrderId(1),
                    state: OrderState::ReplacePending
                }
            ),
            (
                NotificationKind::OrderFilled,
                OrderError::FillOnRejectedOrder(OrderId(2))
            ),
            (
                NotificationKind::RequestAcknowledged,
                OrderError::OrderNotFound(OrderId(99))
            ),
            (
                NotificationKind::RequestRejected,
                OrderError::OrderNotFound(OrderId(98))
            ),
        ]
    );

    // Only the accepted replace moved the sell-side confirmed value.
    assert_eq!(before.confirmed_order_value(Side::Sell), units(200));
    assert_eq!(mgr.exposure(), &after_first_replace);
    assert!(mgr.confirmed_order_value(Side::Sell).is_zero());
    assert_eq!(mgr.get_order(&OrderId(2)).unwrap().filled_quantity(), 0);
    assert_eq!(mgr.net_filled_quantity(), 0);
}

#[test]
fn test_processing_continues_after_reported_condition() {
    let mut mgr = OrderManager::new();
    mgr.on_order_filled(OrderId(5), 2);
    mgr.on_insert_order_request(OrderId(5), Side::Buy, units(10), 2);
    mgr.on_request_acknowledged(OrderId(5));
    mgr.on_order_filled(OrderId(5), 2);

    assert_eq!(mgr.take_diagnostics().len(), 1);
    let order = mgr.get_order(&OrderId(5)).unwrap();
    assert_eq!(order.state(), OrderState::Completed);
    assert_eq!(mgr.net_filled_quantity(), 2);
    assert!(mgr.confirmed_order_value(Side::Buy).is_zero());
}

#[test]
fn test_both_sides_tracked_independently() {
    let mut mgr = OrderManager::new();
    mgr.on_insert_order_request(OrderId(1), Side::Buy, Price::new(10050, 2), 10);
    mgr.on_insert_order_request(OrderId(2), Side::Sell, Price::new(10100, 2), 6);
    mgr.on_request_acknowledged(OrderId(1));
    mgr.on_request_acknowledged(OrderId(2));
    mgr.on_order_filled(OrderId(1), 4);
    mgr.on_order_filled(OrderId(2), 6);

    assert_eq!(mgr.net_filled_quantity(), -2);
    // 6 remaining @ 100.50
    assert_eq!(mgr.confirmed_order_value(Side::Buy), Price::new(60300, 2));
    assert!(mgr.confirmed_order_value(Side::Sell).is_zero());
    assert_eq!(
        mgr.get_order(&OrderId(2)).unwrap().state(),
        OrderState::Completed
    );
}
