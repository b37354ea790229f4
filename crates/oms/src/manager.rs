//! Order manager: notification dispatch and aggregate maintenance.
//!
//! [`OrderManager`] owns every tracked [`Order`], the descriptors of replace
//! requests still awaiting a response, and the [`Exposure`] aggregates. Each
//! [`Listener`] call looks up the order, applies one transition and adjusts
//! the aggregates in the same step:
//!
//! | From | Event | To | Aggregates |
//! |---|---|---|---|
//! | - | Insert | NewPending | - |
//! | NewPending | Ack | derived from quantities | +COV(remaining) |
//! | NewPending | Reject | Rejected | - |
//! | not pending | Replace | ReplacePending | −COV(remaining) |
//! | ReplacePending | Ack | derived, after delta | +COV(new remaining) |
//! | ReplacePending | Reject | derived, quantities unchanged | +COV(remaining) |
//! | not Rejected | Fill | unchanged while pending, else derived | ±NFQ, −COV(fill) |
//!
//! Every handler computes the new order and aggregates before committing
//! either, so a notification is applied whole or not at all.
//! Notifications that cannot be applied, including those whose values would
//! overflow, are dropped and reported through the diagnostic channel; see [`OrderManager::take_diagnostics`] and
//! [`OrderManager::on_diagnostic`].
//!
//! The manager is single-threaded. Use [`crate::SharedOrderManager`] when
//! several producers deliver notifications.

use std::collections::HashMap;

use ox_core::config::{OmsConfig, ReplaceKeying};
use ox_core::types::*;

use crate::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticObserver, OrderError};
use crate::exposure::Exposure;
use crate::listener::{Listener, NotificationKind};
use crate::order::{Order, OrderState};

/// An outstanding replace request, keyed by the order's map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PendingReplace {
    /// Identifier the order takes once the replace is acknowledged.
    pub new_id: OrderId,
    /// Signed change to total and remaining quantity.
    pub delta_quantity: i64,
}

/// Tracks orders through their lifecycle and maintains exposure aggregates.
pub struct OrderManager {
    orders: HashMap<OrderId, Order>,
    pending_replaces: HashMap<OrderId, PendingReplace>,
    exposure: Exposure,
    replace_keying: ReplaceKeying,
    diagnostics: DiagnosticLog,
}

impl OrderManager {
    /// Create an empty manager with default configuration.
    pub fn new() -> Self {
        Self::with_config(&OmsConfig::default())
    }

    pub fn with_config(config: &OmsConfig) -> Self {
        Self {
            orders: HashMap::new(),
            pending_replaces: HashMap::new(),
            exposure: Exposure::new(),
            replace_keying: config.replace_keying,
            diagnostics: DiagnosticLog::new(config.diagnostics_capacity),
        }
    }

    // ── Query surface ──────────────────────────────────────────────────

    /// Net filled quantity across all orders (buys positive, sells negative).
    pub fn net_filled_quantity(&self) -> i64 {
        self.exposure.net_filled_quantity()
    }

    pub fn confirmed_order_value(&self, side: Side) -> Price {
        self.exposure.confirmed_order_value(side)
    }

    pub fn pending_order_value_min(&self, side: Side) -> Price {
        self.exposure.pending_order_value_min(side)
    }

    pub fn pending_order_value_max(&self, side: Side) -> Price {
        self.exposure.pending_order_value_max(side)
    }

    pub fn exposure(&self) -> &Exposure {
        &self.exposure
    }

    /// Order stored under `id`.
    pub fn get_order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Outstanding replace for the order stored under `id`.
    pub fn pending_replace(&self, id: &OrderId) -> Option<&PendingReplace> {
        self.pending_replaces.get(id)
    }

    /// Orders that are neither Completed nor Rejected, with their map keys.
    pub fn open_orders(&self) -> impl Iterator<Item = (OrderId, &Order)> + '_ {
        self.orders
            .iter()
            .filter(|(_, order)| !order.state().is_closed())
            .map(|(key, order)| (*key, order))
    }

    /// All orders with their map keys.
    pub fn orders(&self) -> impl Iterator<Item = (OrderId, &Order)> + '_ {
        self.orders.iter().map(|(key, order)| (*key, order))
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    // ── Diagnostic channel ─────────────────────────────────────────────

    /// Drain buffered diagnostics, oldest first.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }

    /// Number of diagnostics dropped because the buffer was full.
    pub fn evicted_diagnostics(&self) -> u64 {
        self.diagnostics.evicted()
    }

    /// Register a callback invoked synchronously for every diagnostic.
    pub fn on_diagnostic<F>(&mut self, observer: F)
    where
        F: Fn(&Diagnostic) + Send + 'static,
    {
        self.diagnostics.subscribe(Box::new(observer) as DiagnosticObserver);
    }

    // ── Transitions ────────────────────────────────────────────────────

    /// An identifier is taken if an order is stored under it or an
    /// outstanding replace will move an order to it.
    fn is_id_in_use(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
            || self.pending_replaces.values().any(|p| p.new_id == id)
    }

    fn insert_order(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: i64,
    ) -> Result<(), OrderError> {
        if self.is_id_in_use(id) {
            return Err(OrderError::DuplicateOrder(id));
        }
        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                order_id: id,
                quantity,
            });
        }

        self.orders.insert(id, Order::new(id, side, price, quantity));
        tracing::debug!(order_id = %id, side = %side, price = %price, quantity, "order inserted");
        Ok(())
    }

    fn request_replace(
        &mut self,
        old_id: OrderId,
        new_id: OrderId,
        delta_quantity: i64,
    ) -> Result<(), OrderError> {
        let order = self
            .orders
            .get(&old_id)
            .ok_or(OrderError::OrderNotFound(old_id))?;
        let state = order.state();
        if state.is_pending() {
            return Err(OrderError::AlreadyPending {
                order_id: old_id,
                state,
            });
        }
        if new_id != old_id && self.is_id_in_use(new_id) {
            return Err(OrderError::DuplicateOrder(new_id));
        }

        let overflow = || OrderError::ValueOverflow { order_id: old_id };
        let withdrawn = order
            .remaining_value()
            .and_then(Price::checked_neg)
            .ok_or_else(overflow)?;
        let mut exposure = self.exposure.clone();
        exposure
            .adjust_confirmed(order.side(), withdrawn)
            .ok_or_else(overflow)?;

        let order = self
            .orders
            .get_mut(&old_id)
            .ok_or(OrderError::OrderNotFound(old_id))?;
        order.mark_replace_pending();
        self.pending_replaces.insert(
            old_id,
            PendingReplace {
                new_id,
                delta_quantity,
            },
        );
        self.exposure = exposure;

        tracing::debug!(
            order_id = %old_id,
            new_id = %new_id,
            delta_quantity,
            "replace requested"
        );
        Ok(())
    }

    fn acknowledge(&mut self, id: OrderId) -> Result<(), OrderError> {
        let order = self
            .orders
            .get(&id)
            .ok_or(OrderError::OrderNotFound(id))?;
        let overflow = || OrderError::ValueOverflow { order_id: id };

        // Work on a copy; nothing is committed until every value is known.
        let mut next = order.clone();
        let mut rekey_to = None;
        match next.state() {
            OrderState::NewPending => {
                next.recompute_state(true);
            }
            OrderState::ReplacePending => {
                match self.pending_replaces.get(&id) {
                    Some(replace) => {
                        next.apply_replace(replace.new_id, replace.delta_quantity)
                            .ok_or_else(overflow)?;
                        if self.replace_keying == ReplaceKeying::Rekey && replace.new_id != id {
                            rekey_to = Some(replace.new_id);
                        }
                    }
                    None => {
                        tracing::error!(order_id = %id, "replace pending without a descriptor");
                    }
                }
                next.recompute_state(true);
            }
            state => {
                return Err(OrderError::AcknowledgedInNonPendingState {
                    order_id: id,
                    state,
                });
            }
        }

        let confirmed = next.remaining_value().ok_or_else(overflow)?;
        let mut exposure = self.exposure.clone();
        exposure
            .adjust_confirmed(next.side(), confirmed)
            .ok_or_else(overflow)?;

        tracing::debug!(
            order_id = %id,
            tracking_id = %next.id(),
            state = ?next.state(),
            remaining = next.remaining_quantity(),
            "request acknowledged"
        );

        self.pending_replaces.remove(&id);
        self.exposure = exposure;
        match rekey_to {
            Some(new_id) => {
                self.orders.remove(&id);
                self.orders.insert(new_id, next);
                tracing::debug!(from = %id, to = %new_id, "order re-keyed");
            }
            None => {
                self.orders.insert(id, next);
            }
        }
        Ok(())
    }

    fn reject(&mut self, id: OrderId) -> Result<(), OrderError> {
        let order = self
            .orders
            .get(&id)
            .ok_or(OrderError::OrderNotFound(id))?;
        let overflow = || OrderError::ValueOverflow { order_id: id };

        let mut next = order.clone();
        let mut exposure = self.exposure.clone();
        match next.state() {
            OrderState::NewPending => {
                next.mark_rejected();
            }
            OrderState::ReplacePending => {
                if !self.pending_replaces.contains_key(&id) {
                    tracing::error!(order_id = %id, "replace pending without a descriptor");
                }
                next.recompute_state(true);
                let restored = next.remaining_value().ok_or_else(overflow)?;
                exposure
                    .adjust_confirmed(next.side(), restored)
                    .ok_or_else(overflow)?;
            }
            state => {
                return Err(OrderError::RejectedInNonPendingState {
                    order_id: id,
                    state,
                });
            }
        }

        tracing::debug!(order_id = %id, state = ?next.state(), "request rejected");
        self.pending_replaces.remove(&id);
        self.exposure = exposure;
        self.orders.insert(id, next);
        Ok(())
    }

    fn fill(&mut self, id: OrderId, quantity: i64) -> Result<(), OrderError> {
        let order = self
            .orders
            .get(&id)
            .ok_or(OrderError::OrderNotFound(id))?;
        if order.state() == OrderState::Rejected {
            return Err(OrderError::FillOnRejectedOrder(id));
        }
        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                order_id: id,
                quantity,
            });
        }
        let overflow = || OrderError::ValueOverflow { order_id: id };

        let value = order.price().checked_mul(quantity).ok_or_else(overflow)?;
        let mut next = order.clone();
        next.apply_fill(quantity).ok_or_else(overflow)?;
        next.recompute_state(false);
        let mut exposure = self.exposure.clone();
        exposure
            .record_fill(next.side(), quantity, value)
            .ok_or_else(overflow)?;

        tracing::debug!(
            order_id = %id,
            quantity,
            filled = next.filled_quantity(),
            remaining = next.remaining_quantity(),
            state = ?next.state(),
            "order filled"
        );
        self.exposure = exposure;
        self.orders.insert(id, next);
        Ok(())
    }

    /// Surface a failed transition; the notification has already been dropped.
    fn settle(&mut self, kind: NotificationKind, result: Result<(), OrderError>) {
        if let Err(error) = result {
            self.diagnostics.report(kind, error);
        }
    }
}

impl Default for OrderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for OrderManager {
    fn on_insert_order_request(&mut self, id: OrderId, side: Side, price: Price, quantity: i64) {
        let result = self.insert_order(id, side, price, quantity);
        self.settle(NotificationKind::InsertOrderRequest, result);
    }

    fn on_replace_order_request(&mut self, old_id: OrderId, new_id: OrderId, delta_quantity: i64) {
        let result = self.request_replace(old_id, new_id, delta_quantity);
        self.settle(NotificationKind::ReplaceOrderRequest, result);
    }

    fn on_request_acknowledged(&mut self, id: OrderId) {
        let result = self.acknowledge(id);
        self.settle(NotificationKind::RequestAcknowledged, result);
    }

    fn on_request_rejected(&mut self, id: OrderId) {
        let result = self.reject(id);
        self.settle(NotificationKind::RequestRejected, result);
    }

    fn on_order_filled(&mut self, id: OrderId, quantity_filled: i64) {
        let result = self.fill(id, quantity_filled);
        self.settle(NotificationKind::OrderFilled, result);
    }
}
