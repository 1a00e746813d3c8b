// vitrin/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Flat-rate checkout parameters. Tax is carried in basis points so order
  // math stays in integers end to end.
  pub shipping_fee_cents: i64,
  pub tax_rate_bps: i64,

  // Session lifetime for issued auth tokens.
  pub session_ttl_hours: i64,

  // Optional: apply schema.sql / demo catalog on startup.
  pub apply_schema: bool,
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let shipping_fee_cents = get_env("SHIPPING_FEE_CENTS")
      .unwrap_or_else(|_| "5000".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid SHIPPING_FEE_CENTS: {}", e)))?;
    let tax_rate_bps = get_env("TAX_RATE_BPS")
      .unwrap_or_else(|_| "1800".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid TAX_RATE_BPS: {}", e)))?;
    if !(0..=10_000).contains(&tax_rate_bps) {
      return Err(AppError::Config(format!(
        "TAX_RATE_BPS must be between 0 and 10000, got {}",
        tax_rate_bps
      )));
    }

    let session_ttl_hours = get_env("SESSION_TTL_HOURS")
      .unwrap_or_else(|_| "720".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_HOURS: {}", e)))?;

    let apply_schema = get_env("APPLY_SCHEMA")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid APPLY_SCHEMA value: {}", e)))?;
    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      shipping_fee_cents,
      tax_rate_bps,
      session_ttl_hours,
      apply_schema,
      seed_db,
    })
  }
}
