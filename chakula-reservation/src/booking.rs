use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default seating limit per booking.
pub const MAX_GUESTS: u32 = 6;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("select an outlet and a table before booking")]
    NoTableSelected,

    #[error("guest count must be between 1 and {max}")]
    GuestCountOutOfRange { max: u32 },

    #[error("cannot book for a past date or time")]
    TimeInPast,
}

/// POST /reservations/ payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub outlet_id: i64,
    pub table_id: i64,
    pub time_reserved_for: DateTime<Utc>,
    pub number_of_guests: u32,
}

impl NewReservation {
    /// Pre-submit validation, mirroring what the booking form enforces.
    /// Runs before any network call.
    pub fn validate(&self, now: DateTime<Utc>, max_guests: u32) -> Result<(), BookingError> {
        if self.outlet_id <= 0 || self.table_id <= 0 {
            return Err(BookingError::NoTableSelected);
        }
        if self.number_of_guests < 1 || self.number_of_guests > max_guests {
            return Err(BookingError::GuestCountOutOfRange { max: max_guests });
        }
        if self.time_reserved_for <= now {
            return Err(BookingError::TimeInPast);
        }
        Ok(())
    }
}
