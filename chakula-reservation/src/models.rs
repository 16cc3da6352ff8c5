use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl ReservationStatus {
    /// Transitions the client may trigger. The reservation service stays
    /// authoritative; this only gates which actions are offered.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Canceled)
                | (ReservationStatus::Confirmed, ReservationStatus::Canceled)
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid reservation transition from {from:?} to {to:?}")]
pub struct ReservationTransitionError {
    pub from: ReservationStatus,
    pub to: ReservationStatus,
}

/// A table booking held by the reservation service. The deposit, once paid,
/// is marked deducted when it offsets an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: i64,
    pub outlet_id: i64,
    pub table_id: i64,
    pub status: ReservationStatus,
    pub is_fee_deducted: bool,
    pub number_of_guests: u32,
    pub time_reserved_for: DateTime<Utc>,
}

impl Reservation {
    /// Eligible to offset an order total: deposit paid in, not yet consumed.
    pub fn is_discount_eligible(&self) -> bool {
        self.status == ReservationStatus::Confirmed && !self.is_fee_deducted
    }
}
