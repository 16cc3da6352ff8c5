use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::CoreError;

/// Replaces everything but the last 4 digits of a card number on the wire.
pub const CARD_MASK: &str = "****";

/// Stand-in for the gateway round trip; applied before orders are submitted.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// The closed set of payment methods the food court accepts. Which fields
/// ride along is decided by the variant, not by optional columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum PaymentMethod {
    MobileMoney { phone_number: String },
    Card { number: String, expiry: String },
    Cash,
}

impl PaymentMethod {
    /// Copy with the card PAN reduced to the fixed mask plus its last 4
    /// digits. Other methods carry nothing that needs masking.
    pub fn masked(&self) -> PaymentMethod {
        match self {
            PaymentMethod::Card { number, expiry } => {
                let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
                let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
                PaymentMethod::Card {
                    number: format!("{CARD_MASK} {tail}"),
                    expiry: expiry.clone(),
                }
            }
            other => other.clone(),
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorize a charge and return the sanitized payment info that may be
    /// attached to order payloads.
    async fn authorize(
        &self,
        method: &PaymentMethod,
        amount: i64,
    ) -> Result<PaymentMethod, Box<dyn std::error::Error + Send + Sync>>;
}

/// Gateway stand-in: validates the entered details, waits the fixed
/// processing delay, then echoes the masked payment info.
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Zero-delay gateway for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESSING_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(
        &self,
        method: &PaymentMethod,
        amount: i64,
    ) -> Result<PaymentMethod, Box<dyn std::error::Error + Send + Sync>> {
        match method {
            PaymentMethod::MobileMoney { phone_number } if phone_number.trim().is_empty() => {
                return Err(CoreError::ValidationError("a phone number is required".to_string()).into());
            }
            PaymentMethod::Card { number, expiry } => {
                if number.chars().filter(char::is_ascii_digit).count() < 4 {
                    return Err(CoreError::ValidationError("card number is incomplete".to_string()).into());
                }
                if expiry.trim().is_empty() {
                    return Err(CoreError::ValidationError("card expiry is required".to_string()).into());
                }
            }
            _ => {}
        }

        tokio::time::sleep(self.delay).await;
        info!(amount, "simulated payment authorized");
        Ok(method.masked())
    }
}
