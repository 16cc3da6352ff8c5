pub mod payment;
pub mod session;
pub mod storage;

pub use payment::{PaymentGateway, PaymentMethod, SimulatedGateway};
pub use session::{AuthUser, SessionStore, UserRole};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
