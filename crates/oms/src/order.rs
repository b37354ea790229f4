//! Per-order record and its local state rule.
//!
//! An [`Order`] keeps quantity bookkeeping and status separately: fills always
//! move quantities, while the status is re-derived from quantities only when
//! the order is not waiting on a request, or when the caller explicitly
//! resolves that request.

use ox_core::types::*;

/// Order states in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OrderState {
    /// Insert request sent, awaiting acknowledgement or rejection.
    NewPending,
    /// Live in the market with nothing filled.
    Active,
    /// Insert rejected; the order never became live.
    Rejected,
    /// Replace request sent, awaiting acknowledgement or rejection.
    ReplacePending,
    /// Live with some quantity filled and some remaining.
    PartiallyFilled,
    /// Remaining quantity exhausted (possibly overfilled).
    Completed,
}

impl OrderState {
    /// Returns `true` while a request is in flight (exactly one ack or
    /// reject is expected next).
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NewPending | Self::ReplacePending)
    }

    /// States that an implicit recompute must not move the order out of.
    fn is_frozen(&self) -> bool {
        matches!(self, Self::NewPending | Self::ReplacePending | Self::Rejected)
    }

    /// Returns `true` for states with no remaining live quantity.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

/// A client order and its quantity bookkeeping.
///
/// Outside pending states `filled_quantity + remaining_quantity ==
/// total_quantity`. While a replace that raises the quantity is pending, fills
/// may run ahead of the total and drive `remaining_quantity` negative.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    price: Price,
    total_quantity: i64,
    filled_quantity: i64,
    remaining_quantity: i64,
    state: OrderState,
}

impl Order {
    /// A freshly inserted order in `NewPending`, nothing filled.
    pub fn new(id: OrderId, side: Side, price: Price, quantity: i64) -> Self {
        Self {
            id,
            side,
            price,
            total_quantity: quantity,
            filled_quantity: 0,
            remaining_quantity: quantity,
            state: OrderState::NewPending,
        }
    }

    /// Current tracking identifier. Changes when a replace is acknowledged.
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Filled plus remaining, as last set by insert or an acknowledged replace.
    pub fn total_quantity(&self) -> i64 {
        self.total_quantity
    }

    pub fn filled_quantity(&self) -> i64 {
        self.filled_quantity
    }

    pub fn remaining_quantity(&self) -> i64 {
        self.remaining_quantity
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    /// Value of the remaining quantity at the order's limit price, or `None`
    /// if it does not fit in a [`Price`].
    pub fn remaining_value(&self) -> Option<Price> {
        self.price.checked_mul(self.remaining_quantity)
    }

    /// Returns `true` when `filled + remaining == total`.
    pub fn is_balanced(&self) -> bool {
        self.filled_quantity.checked_add(self.remaining_quantity) == Some(self.total_quantity)
    }

    /// Re-derive the state from quantities.
    ///
    /// Unless `force_pending_transition` is set, an order in `NewPending`,
    /// `ReplacePending` or `Rejected` keeps its state, so a fill cannot
    /// promote an order out of a pending request.
    pub fn recompute_state(&mut self, force_pending_transition: bool) {
        if !force_pending_transition && self.state.is_frozen() {
            return;
        }

        self.state = if self.filled_quantity == 0 {
            OrderState::Active
        } else if self.remaining_quantity > 0 {
            OrderState::PartiallyFilled
        } else {
            OrderState::Completed
        };
    }

    /// Switch to the new identifier and move total and remaining by `delta`.
    ///
    /// `delta` may be negative. The resulting remaining quantity is not
    /// validated here. Returns `None`, leaving the order untouched, if either
    /// quantity would overflow.
    pub fn apply_replace(&mut self, new_id: OrderId, delta: i64) -> Option<()> {
        let total = self.total_quantity.checked_add(delta)?;
        let remaining = self.remaining_quantity.checked_add(delta)?;
        self.id = new_id;
        self.total_quantity = total;
        self.remaining_quantity = remaining;
        Some(())
    }

    /// Book a fill against the order's quantities. State is left to
    /// [`Order::recompute_state`]. Returns `None` on overflow without
    /// touching the order.
    pub(crate) fn apply_fill(&mut self, quantity: i64) -> Option<()> {
        let filled = self.filled_quantity.checked_add(quantity)?;
        let remaining = self.remaining_quantity.checked_sub(quantity)?;
        self.filled_quantity = filled;
        self.remaining_quantity = remaining;
        Some(())
    }

    pub(crate) fn mark_replace_pending(&mut self) {
        self.state = OrderState::ReplacePending;
    }

    /// Close out a rejected insert. Nothing remains, and the total shrinks to
    /// whatever was filled while the insert was pending.
    pub(crate) fn mark_rejected(&mut self) {
        self.remaining_quantity = 0;
        self.total_quantity = self.filled_quantity;
        self.state = OrderState::Rejected;
    }
}
