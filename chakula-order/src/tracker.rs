use std::collections::HashMap;

use crate::status::{ensure_forward, TransitionError};
use crate::{Order, OrderStatus};

/// A locally observed order status. Optimistic updates are cache entries
/// over server truth and stay unconfirmed until the next poll agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedStatus {
    pub status: OrderStatus,
    pub confirmed: bool,
}

#[derive(Debug, Default)]
pub struct OrderTracker {
    entries: HashMap<i64, TrackedStatus>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, order_id: i64) -> Option<TrackedStatus> {
        self.entries.get(&order_id).copied()
    }

    /// Record an optimistic, unconfirmed transition. Forward-only.
    pub fn apply_local(
        &mut self,
        order_id: i64,
        current: OrderStatus,
        next: OrderStatus,
    ) -> Result<(), TransitionError> {
        ensure_forward(current, next)?;
        self.entries.insert(order_id, TrackedStatus { status: next, confirmed: false });
        Ok(())
    }

    /// Mark server acknowledgement of a single order.
    pub fn confirm(&mut self, order_id: i64, status: OrderStatus) {
        self.entries.insert(order_id, TrackedStatus { status, confirmed: true });
    }

    /// Overwrite tracked entries with server truth. Returns the ids whose
    /// unconfirmed local status disagreed and was rolled back.
    pub fn reconcile(&mut self, server_orders: &[Order]) -> Vec<i64> {
        let mut rolled_back = Vec::new();
        for order in server_orders {
            if let Some(entry) = self.entries.get(&order.id) {
                if !entry.confirmed && entry.status != order.status {
                    rolled_back.push(order.id);
                }
            }
            self.entries.insert(order.id, TrackedStatus { status: order.status, confirmed: true });
        }
        rolled_back
    }
}
