pub mod api;
pub mod booking;
pub mod discount;
pub mod models;

pub use api::{ReservationApi, ReservationCreated};
pub use booking::{BookingError, NewReservation, MAX_GUESTS};
pub use discount::{DiscountResolver, DiscountSummary, RESERVATION_DEPOSIT};
pub use models::{Reservation, ReservationStatus, ReservationTransitionError};
