//! The notification contract between a market adapter and the order manager.
//!
//! Two notifications describe client requests (insert, replace); three are
//! market confirmations (acknowledged, rejected, filled). Every request is
//! followed by exactly one acknowledgement or rejection, while fills can
//! arrive at any point after an insert.

use ox_core::types::*;

/// Receiver of order lifecycle notifications.
///
/// Calls are synchronous and delivered one at a time, in the order the
/// corresponding events happened in the market. Implementations report
/// problems through their own diagnostic channel; nothing is returned.
pub trait Listener {
    /// The client sent a new order to the market.
    fn on_insert_order_request(&mut self, id: OrderId, side: Side, price: Price, quantity: i64);

    /// The client asked to change an order's quantity by `delta_quantity`.
    /// On acknowledgement the order is tracked as `new_id`; on rejection it
    /// stays unchanged under `old_id`.
    fn on_replace_order_request(&mut self, old_id: OrderId, new_id: OrderId, delta_quantity: i64);

    /// The outstanding insert or replace for `id` was accepted.
    fn on_request_acknowledged(&mut self, id: OrderId);

    /// The outstanding insert or replace for `id` was refused.
    fn on_request_rejected(&mut self, id: OrderId);

    /// `quantity_filled` of the order traded.
    fn on_order_filled(&mut self, id: OrderId, quantity_filled: i64);
}

/// One notification, as a value.
///
/// Lets drivers and tests build notification sequences and replay them
/// against any [`Listener`].
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    InsertOrderRequest {
        id: OrderId,
        side: Side,
        price: Price,
        quantity: i64,
    },
    ReplaceOrderRequest {
        old_id: OrderId,
        new_id: OrderId,
        delta_quantity: i64,
    },
    RequestAcknowledged {
        id: OrderId,
    },
    RequestRejected {
        id: OrderId,
    },
    OrderFilled {
        id: OrderId,
        quantity_filled: i64,
    },
}

impl Notification {
    /// Invoke the matching [`Listener`] method.
    pub fn deliver<L: Listener + ?Sized>(&self, listener: &mut L) {
        match *self {
            Notification::InsertOrderRequest {
                id,
                side,
                price,
                quantity,
            } => listener.on_insert_order_request(id, side, price, quantity),
            Notification::ReplaceOrderRequest {
                old_id,
                new_id,
                delta_quantity,
            } => listener.on_replace_order_request(old_id, new_id, delta_quantity),
            Notification::RequestAcknowledged { id } => listener.on_request_acknowledged(id),
            Notification::RequestRejected { id } => listener.on_request_rejected(id),
            Notification::OrderFilled {
                id,
                quantity_filled,
            } => listener.on_order_filled(id, quantity_filled),
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::InsertOrderRequest { .. } => NotificationKind::InsertOrderRequest,
            Notification::ReplaceOrderRequest { .. } => NotificationKind::ReplaceOrderRequest,
            Notification::RequestAcknowledged { .. } => NotificationKind::RequestAcknowledged,
            Notification::RequestRejected { .. } => NotificationKind::RequestRejected,
            Notification::OrderFilled { .. } => NotificationKind::OrderFilled,
        }
    }
}

/// Which notification a diagnostic was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum NotificationKind {
    InsertOrderRequest,
    ReplaceOrderRequest,
    RequestAcknowledged,
    RequestRejected,
    OrderFilled,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NotificationKind::InsertOrderRequest => "OnInsertOrderRequest",
            NotificationKind::ReplaceOrderRequest => "OnReplaceOrderRequest",
            NotificationKind::RequestAcknowledged => "OnRequestAcknowledged",
            NotificationKind::RequestRejected => "OnRequestRejected",
            NotificationKind::OrderFilled => "OnOrderFilled",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the calls it receives.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Listener for Recorder {
        fn on_insert_order_request(&mut self, id: OrderId, side: Side, price: Price, quantity: i64) {
            self.calls.push(format!("insert {id} {side} {price} {quantity}"));
        }
        fn on_replace_order_request(&mut self, old_id: OrderId, new_id: OrderId, delta: i64) {
            self.calls.push(format!("replace {old_id} {new_id} {delta}"));
        }
        fn on_request_acknowledged(&mut self, id: OrderId) {
            self.calls.push(format!("ack {id}"));
        }
        fn on_request_rejected(&mut self, id: OrderId) {
            self.calls.push(format!("reject {id}"));
        }
        fn on_order_filled(&mut self, id: OrderId, quantity_filled: i64) {
            self.calls.push(format!("fill {id} {quantity_filled}"));
        }
    }

    #[test]
    fn test_deliver_dispatches_each_variant() {
        let notifications = [
            Notification::InsertOrderRequest {
                id: OrderId(1),
                side: Side::Sell,
                price: Price::new(995, 1),
                quantity: 3,
            },
            Notification::ReplaceOrderRequest {
                old_id: OrderId(1),
                new_id: OrderId(2),
                delta_quantity: -1,
            },
            Notification::RequestAcknowledged { id: OrderId(1) },
            Notification::RequestRejected { id: OrderId(2) },
            Notification::OrderFilled {
                id: OrderId(2),
                quantity_filled: 1,
            },
        ];

        let mut recorder = Recorder::default();
        for n in &notifications {
            n.deliver(&mut recorder);
        }

        assert_eq!(
            recorder.calls,
            vec![
                "insert OID-1 Sell 99.5 3",
                "replace OID-1 OID-2 -1",
                "ack OID-1",
                "reject OID-2",
                "fill OID-2 1",
            ]
        );
    }

    #[test]
    fn test_kind_and_display() {
        let n = Notification::RequestRejected { id: OrderId(7) };
        assert_eq!(n.kind(), NotificationKind::RequestRejected);
        assert_eq!(n.kind().to_string(), "OnRequestRejected");
    }
}
