pub mod config;
pub mod driven;
pub mod driver;
pub mod storage_error;

pub use config::{AppConfig, ConfigError};
pub use storage_error::StorageError;
