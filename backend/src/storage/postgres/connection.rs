use anyhow::{Context as _, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::sync::Arc;

/// Postgres connection settings as supplied by process configuration.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// `host:port` of the server
    pub address: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostgresConfigError {
    #[error("empty postgres address")]
    EmptyAddress,
    #[error("empty postgres database")]
    EmptyDatabase,
    #[error("empty postgres user")]
    EmptyUser,
    #[error("empty postgres password")]
    EmptyPassword,
    #[error("postgres address must be host:port, got {0:?}")]
    MissingHostOrPort(String),
    #[error("invalid postgres port: {0:?}")]
    InvalidPort(String),
}

impl PostgresConfig {
    fn host_and_port(&self) -> Result<(&str, u16), PostgresConfigError> {
        if self.address.is_empty() {
            return Err(PostgresConfigError::EmptyAddress);
        }
        if self.database.is_empty() {
            return Err(PostgresConfigError::EmptyDatabase);
        }
        if self.user.is_empty() {
            return Err(PostgresConfigError::EmptyUser);
        }
        if self.password.is_empty() {
            return Err(PostgresConfigError::EmptyPassword);
        }

        let parts: Vec<&str> = self.address.split(':').collect();
        match parts.as_slice() {
            [host, port] if !host.is_empty() && !port.is_empty() => {
                let port = port
                    .parse()
                    .map_err(|_| PostgresConfigError::InvalidPort(port.to_string()))?;
                Ok((*host, port))
            }
            _ => Err(PostgresConfigError::MissingHostOrPort(self.address.clone())),
        }
    }

    /// Validate the settings and assemble the connection options (TLS disabled).
    pub fn connect_options(&self) -> Result<PgConnectOptions, PostgresConfigError> {
        let (host, port) = self.host_and_port()?;
        Ok(PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(PgSslMode::Disable))
    }
}

/// DbConnection owns the Postgres connection pool
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<PgPool>,
}

impl DbConnection {
    /// Create the pool without connecting; the first query opens a connection.
    pub fn new(config: &PostgresConfig) -> Result<Self> {
        let options = config
            .connect_options()
            .context("invalid configuration")?;

        let pool = PgPoolOptions::new().connect_lazy_with(options);

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(address: &str) -> PostgresConfig {
        PostgresConfig {
            address: address.to_string(),
            database: "coins".to_string(),
            user: "coins".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_host_and_port_are_split() {
        assert_eq!(
            config("db.local:5432").host_and_port().unwrap(),
            ("db.local", 5432)
        );
        assert!(config("db.local:5432").connect_options().is_ok());
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        assert_eq!(
            config("db.local:pg").connect_options().err(),
            Some(PostgresConfigError::InvalidPort("pg".to_string()))
        );
    }

    #[test]
    fn test_address_without_port_is_rejected() {
        assert_eq!(
            config("db.local").host_and_port(),
            Err(PostgresConfigError::MissingHostOrPort("db.local".to_string()))
        );
        assert!(config("a:b:c").host_and_port().is_err());
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut cfg = config("db.local:5432");
        cfg.password.clear();
        assert_eq!(cfg.host_and_port(), Err(PostgresConfigError::EmptyPassword));

        let mut cfg = config("db.local:5432");
        cfg.database.clear();
        assert_eq!(cfg.host_and_port(), Err(PostgresConfigError::EmptyDatabase));

        assert_eq!(config("").host_and_port(), Err(PostgresConfigError::EmptyAddress));
    }
}
