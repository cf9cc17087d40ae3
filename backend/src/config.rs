//! Process configuration.
//!
//! Every setting can be given as a flag or through its environment variable;
//! it is read once at startup.

use std::time::Duration;

use clap::Parser;

use crate::io::ServerConfig;
use crate::storage::PostgresConfig;

/// Prefix of every metric the service registers.
pub const METRIC_PREFIX: &str = "coins_payments";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("empty duration")]
    EmptyDuration,
    #[error("invalid duration {0:?}")]
    InvalidDuration(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
}

/// Payments service exposing payments and accounts over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "coins")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// HTTP listening port.
    #[arg(long, env = "PORT")]
    pub port: u16,

    /// Time allowed to read a request body (0 disables the limit).
    #[arg(long, default_value = "1s", env = "READ_TIMEOUT", value_parser = parse_duration)]
    pub read_timeout: Duration,

    /// Time allowed to produce a response (0 disables the limit).
    #[arg(long, default_value = "1s", env = "WRITE_TIMEOUT", value_parser = parse_duration)]
    pub write_timeout: Duration,

    /// Time allowed for in-flight requests to finish on shutdown.
    #[arg(long, default_value = "1s", env = "SHUTDOWN_TIMEOUT", value_parser = parse_duration)]
    pub shutdown_timeout: Duration,

    /// Comma separated CORS origins; CORS is off when empty.
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Postgres server as host:port.
    #[arg(long, env = "POSTGRES_ADDRESS")]
    pub postgres_address: String,

    #[arg(long, env = "POSTGRES_DATABASE")]
    pub postgres_database: String,

    #[arg(long, env = "POSTGRES_USER")]
    pub postgres_user: String,

    #[arg(long, env = "POSTGRES_PASSWORD", hide_env_values = true)]
    pub postgres_password: String,

    /// Log level.
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,
}

impl Config {
    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            port: self.port,
            read_timeout: non_zero(self.read_timeout),
            write_timeout: non_zero(self.write_timeout),
            shutdown_timeout: self.shutdown_timeout,
            allowed_origins: self
                .allowed_origins
                .iter()
                .map(|origin| origin.trim())
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn postgres(&self) -> PostgresConfig {
        PostgresConfig {
            address: self.postgres_address.clone(),
            database: self.postgres_database.clone(),
            user: self.postgres_user.clone(),
            password: self.postgres_password.clone(),
        }
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

/// Parse durations such as `1s`, `500ms`, `1.5s` or `1m30s`.
///
/// Units: `ns`, `us`, `ms`, `s`, `m`, `h`. A bare `0` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyDuration);
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }

    let invalid = || ConfigError::InvalidDuration(input.to_string());
    let mut total_nanos = 0f64;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_end == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_end].parse().map_err(|_| invalid())?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            unit => {
                return Err(ConfigError::UnknownUnit {
                    unit: unit.to_string(),
                    input: input.to_string(),
                })
            }
        };
        rest = &rest[unit_end..];
        total_nanos += value * nanos_per_unit;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
