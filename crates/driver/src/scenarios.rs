//! Built-in notification scenarios.

use ox_core::types::*;
use ox_oms::Notification;

/// A named, ordered notification sequence.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub notifications: Vec<Notification>,
}

/// Scenario selector for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioChoice {
    /// Fills overtake a quantity-increasing replace, then the replace is acked.
    ReplaceOverfill,
    /// A replace is refused and the order falls back to its old quantity.
    ReplaceRejected,
    /// An insert is refused and later fills against it are reported.
    InsertRejected,
    /// Every scenario above, in order.
    All,
}

impl ScenarioChoice {
    pub fn scenarios(self) -> Vec<Scenario> {
        match self {
            ScenarioChoice::ReplaceOverfill => vec![replace_overfill()],
            ScenarioChoice::ReplaceRejected => vec![replace_rejected()],
            ScenarioChoice::InsertRejected => vec![insert_rejected()],
            ScenarioChoice::All => vec![replace_overfill(), replace_rejected(), insert_rejected()],
        }
    }
}

fn insert(id: u64, side: Side, price: i64, quantity: i64) -> Notification {
    Notification::InsertOrderRequest {
        id: OrderId(id),
        side,
        price: Price::from_units(price),
        quantity,
    }
}

fn replace(old_id: u64, new_id: u64, delta_quantity: i64) -> Notification {
    Notification::ReplaceOrderRequest {
        old_id: OrderId(old_id),
        new_id: OrderId(new_id),
        delta_quantity,
    }
}

fn ack(id: u64) -> Notification {
    Notification::RequestAcknowledged { id: OrderId(id) }
}

fn reject(id: u64) -> Notification {
    Notification::RequestRejected { id: OrderId(id) }
}

fn fill(id: u64, quantity_filled: i64) -> Notification {
    Notification::OrderFilled {
        id: OrderId(id),
        quantity_filled,
    }
}

/// Buy 10 @ 200; fills of 5, 5 and 1 race a +2 replace that is acked last.
pub fn replace_overfill() -> Scenario {
    Scenario {
        name: "replace-overfill",
        notifications: vec![
            insert(100, Side::Buy, 200, 10),
            ack(100),
            fill(100, 5),
            replace(100, 101, 2),
            fill(100, 5),
            fill(100, 1),
            ack(100),
        ],
    }
}

/// Sell 8 @ 150 partially filled; a -3 replace is rejected.
pub fn replace_rejected() -> Scenario {
    Scenario {
        name: "replace-rejected",
        notifications: vec![
            insert(200, Side::Sell, 150, 8),
            ack(200),
            fill(200, 2),
            replace(200, 201, -3),
            fill(200, 1),
            reject(200),
            fill(200, 5),
        ],
    }
}

/// An insert refused by the market; the stray fill is reported.
pub fn insert_rejected() -> Scenario {
    Scenario {
        name: "insert-rejected",
        notifications: vec![
            insert(300, Side::Buy, 99, 4),
            reject(300),
            fill(300, 1),
            ack(300),
        ],
    }
}
