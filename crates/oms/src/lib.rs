//! # ox-oms
//!
//! Order lifecycle tracking and exposure aggregates. An [`OrderManager`]
//! receives insert, replace, acknowledgement, rejection and fill
//! notifications through the [`Listener`] contract, keeps each order's
//! quantity and state bookkeeping, and maintains net filled quantity and
//! confirmed order value as a side effect of every transition.

pub mod diagnostics;
pub mod exposure;
pub mod listener;
pub mod manager;
pub mod order;
pub mod shared;

pub use diagnostics::{Diagnostic, DiagnosticObserver, OrderError};
pub use exposure::{Exposure, PerSide};
pub use listener::{Listener, Notification, NotificationKind};
pub use manager::{OrderManager, PendingReplace};
pub use order::{Order, OrderState};
pub use shared::SharedOrderManager;
