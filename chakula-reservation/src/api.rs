use async_trait::async_trait;
use serde::Deserialize;

use crate::{NewReservation, Reservation, ReservationStatus};

/// Server acknowledgement for a newly created booking.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationCreated {
    pub reservation_id: i64,
}

/// Access to the reservation resources of the REST backend.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    async fn create_reservation(
        &self,
        req: &NewReservation,
    ) -> Result<ReservationCreated, Box<dyn std::error::Error + Send + Sync>>;

    /// The caller's own reservations, all statuses.
    async fn my_reservations(
        &self,
    ) -> Result<Vec<Reservation>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Marks the deposit as paid; the service moves the booking to confirmed.
    async fn confirm(&self, id: i64) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn reassign_table(
        &self,
        id: i64,
        table_id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
