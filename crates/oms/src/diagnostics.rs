//! Reported conditions and the channel that surfaces them.
//!
//! A notification that cannot be applied is dropped without mutating
//! anything. The reason is recorded as a [`Diagnostic`], logged, buffered for
//! later draining, and handed to every registered observer.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use ox_core::types::*;

use crate::listener::NotificationKind;
use crate::order::OrderState;

/// Why a notification was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// Insert (or replace target) uses an identifier already tracked or reserved.
    #[error("duplicate order: {0}")]
    DuplicateOrder(OrderId),
    /// No order is tracked under this identifier.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),
    /// A replace was requested while another request is in flight.
    #[error("order {order_id} already has a pending request ({state:?})")]
    AlreadyPending { order_id: OrderId, state: OrderState },
    /// Acknowledgement for an order with no request in flight.
    #[error("acknowledgement for order {order_id} in non-pending state {state:?}")]
    AcknowledgedInNonPendingState { order_id: OrderId, state: OrderState },
    /// Rejection for an order with no request in flight.
    #[error("rejection for order {order_id} in non-pending state {state:?}")]
    RejectedInNonPendingState { order_id: OrderId, state: OrderState },
    /// Fill against an order whose insert was rejected.
    #[error("fill on rejected order: {0}")]
    FillOnRejectedOrder(OrderId),
    /// Insert or fill quantity that is zero or negative.
    #[error("invalid quantity {quantity} for order {order_id}")]
    InvalidQuantity { order_id: OrderId, quantity: i64 },
    /// A quantity or order value the notification implies does not fit in
    /// 64 bits.
    #[error("value overflow on order {order_id}")]
    ValueOverflow { order_id: OrderId },
}

/// A reported condition, stamped with when and where it was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub at: DateTime<Utc>,
    pub notification: NotificationKind,
    pub error: OrderError,
}

/// Callback invoked for every reported diagnostic.
pub type DiagnosticObserver = Box<dyn Fn(&Diagnostic) + Send>;

/// Bounded buffer of undrained diagnostics; evicts the oldest when full.
pub(crate) struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
    evicted: u64,
    observers: Vec<DiagnosticObserver>,
}

impl DiagnosticLog {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            evicted: 0,
            observers: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, observer: DiagnosticObserver) {
        self.observers.push(observer);
    }

    /// Log, notify observers, then buffer.
    pub(crate) fn report(&mut self, notification: NotificationKind, error: OrderError) {
        tracing::warn!(notification = %notification, error = %error, "notification dropped");

        let diagnostic = Diagnostic {
            at: Utc::now(),
            notification,
            error,
        };
        for observer in &self.observers {
            observer(&diagnostic);
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(diagnostic);
    }

    pub(crate) fn drain(&mut self) -> Vec<Diagnostic> {
        self.entries.drain(..).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_report_buffers_in_order() {
        let mut log = DiagnosticLog::new(8);
        log.report(
            NotificationKind::InsertOrderRequest,
            OrderError::DuplicateOrder(OrderId(1)),
        );
        log.report(
            NotificationKind::OrderFilled,
            OrderError::OrderNotFound(OrderId(2)),
        );

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].error, OrderError::DuplicateOrder(OrderId(1)));
        assert_eq!(drained[1].notification, NotificationKind::OrderFilled);
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = DiagnosticLog::new(2);
        for id in 1..=3 {
            log.report(
                NotificationKind::RequestAcknowledged,
                OrderError::OrderNotFound(OrderId(id)),
            );
        }

        assert_eq!(log.evicted(), 1);
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].error, OrderError::OrderNotFound(OrderId(2)));
        assert_eq!(drained[1].error, OrderError::OrderNotFound(OrderId(3)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut log = DiagnosticLog::new(0);
        log.report(
            NotificationKind::RequestRejected,
            OrderError::OrderNotFound(OrderId(9)),
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_observers_see_every_report() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut log = DiagnosticLog::new(1);
        let counter = seen.clone();
        log.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }));

        for _ in 0..3 {
            log.report(
                NotificationKind::OrderFilled,
                OrderError::FillOnRejectedOrder(OrderId(5)),
            );
        }
        assert_eq!(seen.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = OrderError::AlreadyPending {
            order_id: OrderId(100),
            state: OrderState::ReplacePending,
        };
        assert_eq!(
            err.to_string(),
            "order OID-100 already has a pending request (ReplacePending)"
        );
        assert_eq!(
            OrderError::InvalidQuantity {
                order_id: OrderId(3),
                quantity: -2
            }
            .to_string(),
            "invalid quantity -2 for order OID-3"
        );
        assert_eq!(
            OrderError::ValueOverflow {
                order_id: OrderId(4)
            }
            .to_string(),
            "value overflow on order OID-4"
        );
    }
}
