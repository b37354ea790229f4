//! Serialized access to one [`OrderManager`] from several producers.
//!
//! The manager itself assumes one notification at a time. A
//! [`SharedOrderManager`] provides that guarantee: each notification holds
//! the lock for its whole transition, so aggregates and order state are
//! never observed half-updated.

use std::sync::Arc;

use ox_core::config::OmsConfig;
use ox_core::types::*;

use crate::exposure::Exposure;
use crate::listener::Listener;
use crate::manager::OrderManager;

/// Cloneable handle to a mutex-guarded [`OrderManager`].
#[derive(Clone, Default)]
pub struct SharedOrderManager {
    inner: Arc<parking_lot::Mutex<OrderManager>>,
}

impl SharedOrderManager {
    pub fn new(manager: OrderManager) -> Self {
        Self {
            inner: Arc::new(parking_lot::Mutex::new(manager)),
        }
    }

    pub fn with_config(config: &OmsConfig) -> Self {
        Self::new(OrderManager::with_config(config))
    }

    /// Run `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut OrderManager) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Consistent copy of the aggregates.
    pub fn exposure(&self) -> Exposure {
        self.inner.lock().exposure().clone()
    }
}

impl Listener for SharedOrderManager {
    fn on_insert_order_request(&mut self, id: OrderId, side: Side, price: Price, quantity: i64) {
        self.inner
            .lock()
            .on_insert_order_request(id, side, price, quantity);
    }

    fn on_replace_order_request(&mut self, old_id: OrderId, new_id: OrderId, delta_quantity: i64) {
        self.inner
            .lock()
            .on_replace_order_request(old_id, new_id, delta_quantity);
    }

    fn on_request_acknowledged(&mut self, id: OrderId) {
        self.inner.lock().on_request_acknowledged(id);
    }

    fn on_request_rejected(&mut self, id: OrderId) {
        self.inner.lock().on_request_rejected(id);
    }

    fn on_order_filled(&mut self, id: OrderId, quantity_filled: i64) {
        self.inner.lock().on_order_filled(id, quantity_filled);
    }
}
