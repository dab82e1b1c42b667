use crate::domain::port::LogLevel;
use std::env;
use std::path::PathBuf;

/// アプリケーション設定を管理する構造体
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub rooms_file: String,
    pub bookings_file: String,
    pub payment_success_rate: f64,
    pub payment_seed: Option<u64>,
    pub log_level: LogLevel,
}

/// 設定エラー
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// 環境変数から設定を読み取る
    /// 環境変数が設定されていない場合はデフォルト値を使用
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(env::var("HOTEL_DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let rooms_file = env::var("HOTEL_ROOMS_FILE").unwrap_or_else(|_| "rooms.json".to_string());

        let bookings_file =
            env::var("HOTEL_BOOKINGS_FILE").unwrap_or_else(|_| "bookings.json".to_string());

        let payment_success_rate = env::var("HOTEL_PAYMENT_SUCCESS_RATE")
            .unwrap_or_else(|_| "0.9".to_string())
            .parse::<f64>()
            .map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid HOTEL_PAYMENT_SUCCESS_RATE: {}", e))
            })?;
        if !(0.0..=1.0).contains(&payment_success_rate) {
            return Err(ConfigError::InvalidValue(format!(
                "HOTEL_PAYMENT_SUCCESS_RATE must be between 0 and 1: {}",
                payment_success_rate
            )));
        }

        let payment_seed = match env::var("HOTEL_PAYMENT_SEED") {
            Ok(seed) => Some(seed.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid HOTEL_PAYMENT_SEED: {}", e))
            })?),
            Err(_) => None,
        };

        let log_level_str = env::var("HOTEL_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
        let log_level = LogLevel::from_string(&log_level_str).ok_or_else(|| {
            ConfigError::InvalidValue(format!("Invalid HOTEL_LOG_LEVEL: {}", log_level_str))
        })?;

        Ok(Self {
            data_dir,
            rooms_file,
            bookings_file,
            payment_success_rate,
            payment_seed,
            log_level,
        })
    }

    /// 客室ファイルのパス
    pub fn rooms_path(&self) -> PathBuf {
        self.data_dir.join(&self.rooms_file)
    }

    /// 予約ファイルのパス
    pub fn bookings_path(&self) -> PathBuf {
        self.data_dir.join(&self.bookings_file)
    }
}
