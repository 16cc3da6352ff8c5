pub mod app_config;
pub mod kv;
pub mod poll;
pub mod rest;

pub use app_config::Config;
pub use kv::JsonFileStore;
pub use poll::{spawn_poller, DEFAULT_POLL_INTERVAL};
pub use rest::{ApiError, RestClient};
