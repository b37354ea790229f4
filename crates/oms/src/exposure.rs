//! Portfolio-level exposure aggregates.
//!
//! - **Net filled quantity (NFQ)**: signed sum of all fills, buys positive.
//! - **Confirmed order value (COV)**: per side, value of acknowledged live
//!   quantity, excluding quantity tied up in a pending replace.
//! - **Pending order value (POV)**: per side min/max range. Published, but
//!   no notification updates it, so it stays at zero.

use std::ops::{Index, IndexMut};

use ox_core::types::*;

/// A pair of values, one per [`Side`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PerSide<T> {
    pub buy: T,
    pub sell: T,
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }
}

/// Running aggregates maintained by the order manager.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Exposure {
    net_filled_quantity: i64,
    confirmed_order_value: PerSide<Price>,
    pending_order_value_min: PerSide<Price>,
    pending_order_value_max: PerSide<Price>,
}

impl Exposure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net filled quantity across all orders (buys positive, sells negative).
    pub fn net_filled_quantity(&self) -> i64 {
        self.net_filled_quantity
    }

    pub fn confirmed_order_value(&self, side: Side) -> Price {
        self.confirmed_order_value[side]
    }

    pub fn pending_order_value_min(&self, side: Side) -> Price {
        self.pending_order_value_min[side]
    }

    pub fn pending_order_value_max(&self, side: Side) -> Price {
        self.pending_order_value_max[side]
    }

    /// Add a fill to NFQ with the side's sign and take its `value` out of
    /// COV. Returns `None`, changing nothing, if either aggregate overflows.
    pub(crate) fn record_fill(&mut self, side: Side, quantity: i64, value: Price) -> Option<()> {
        let nfq = self
            .net_filled_quantity
            .checked_add(side.sign().checked_mul(quantity)?)?;
        let confirmed = self.confirmed_order_value[side].checked_sub(value)?;
        self.net_filled_quantity = nfq;
        self.confirmed_order_value[side] = confirmed;
        Some(())
    }

    /// Move COV on `side` by `delta` (negative to decrease). Returns `None`
    /// on overflow.
    pub(crate) fn adjust_confirmed(&mut self, side: Side, delta: Price) -> Option<()> {
        self.confirmed_order_value[side] = self.confirmed_order_value[side].checked_add(delta)?;
        Some(())
    }
}
