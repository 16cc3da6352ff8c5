use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub polling: PollingConfig,
    pub payment: PaymentConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Where the client-local key-value state lives on disk.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_seconds: u64,
}

fn default_poll_interval() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    #[serde(default = "default_processing_delay")]
    pub processing_delay_seconds: u64,
}

fn default_processing_delay() -> u64 {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Deposit charged per confirmed booking, in cents.
    #[serde(default = "default_deposit")]
    pub reservation_deposit: i64,
    #[serde(default = "default_max_guests")]
    pub max_guests_per_booking: u32,
}

fn default_deposit() -> i64 {
    chakula_reservation::RESERVATION_DEPOSIT
}

fn default_max_guests() -> u32 {
    chakula_reservation::MAX_GUESTS
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `CHAKULA__API__BASE_URL=...`
            .add_source(config::Environment::with_prefix("CHAKULA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_seconds: default_timeout(),
            },
            storage: StorageConfig { path: "chakula-state.json".to_string() },
            polling: PollingConfig { interval_seconds: default_poll_interval() },
            payment: PaymentConfig { processing_delay_seconds: default_processing_delay() },
            business_rules: BusinessRules {
                reservation_deposit: default_deposit(),
                max_guests_per_booking: default_max_guests(),
            },
        }
    }
}
