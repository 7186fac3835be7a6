// storefront/src/config.rs

use crate::errors::{AppError, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres { database_url: String, max_connections: u32 },
  Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  pub run_migrations: bool,

  /// Currency every payment intent is created in.
  pub payment_currency: String,
  /// Decimal places of `payment_currency` (2 for usd, 0 for jpy).
  pub payment_currency_exponent: u32,
  pub mock_payment_account_id: String,

  pub log_format: LogFormat,
}

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any key lookup; unset keys take their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = match get_or("STORE_BACKEND", "postgres").to_ascii_lowercase().as_str() {
      "postgres" => StoreBackend::Postgres {
        database_url: get_env("DATABASE_URL")?,
        max_connections: get_or("DATABASE_MAX_CONNECTIONS", "10")
          .parse::<u32>()
          .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?,
      },
      "memory" => StoreBackend::Memory,
      other => {
        return Err(AppError::Config(format!(
          "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
          other
        )))
      }
    };

    let run_migrations = get_or("RUN_MIGRATIONS", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let payment_currency = get_or("PAYMENT_CURRENCY", "usd").to_ascii_lowercase();
    if payment_currency.len() != 3 || !payment_currency.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(AppError::Config(format!(
        "Invalid PAYMENT_CURRENCY '{}': expected a three-letter ISO code",
        payment_currency
      )));
    }
    let payment_currency_exponent = get_or("PAYMENT_CURRENCY_EXPONENT", "2")
      .parse::<u32>()
      .ok()
      .filter(|exp| *exp <= 4)
      .ok_or_else(|| AppError::Config("Invalid PAYMENT_CURRENCY_EXPONENT: expected 0..=4".to_string()))?;
    let mock_payment_account_id = get_or("MOCK_PAYMENT_ACCOUNT_ID", "mock_main_acct");

    let log_format = match get_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "json" => LogFormat::Json,
      "pretty" | "text" => LogFormat::Pretty,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      run_migrations,
      payment_currency,
      payment_currency_exponent,
      mock_payment_account_id,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
