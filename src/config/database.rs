// ABOUTME: Database configuration for the PostgreSQL seeding target
// ABOUTME: Reads PG_* connection parameters or a DATABASE_URL and opens a single-connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Environment variable names
pub mod env_config {
    /// Full connection URL, takes precedence over the individual parameters
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Database name
    pub const PG_DB: &str = "PG_DB";
    /// Role name
    pub const PG_USER: &str = "PG_USER";
    /// Role password
    pub const PG_PASS: &str = "PG_PASS";
    /// Server host
    pub const PG_HOST: &str = "PG_HOST";
    /// Server port
    pub const PG_PORT: &str = "PG_PORT";
}

/// Seconds to wait for the single seeding connection
const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Individual `PostgreSQL` connection parameters
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PgParameters {
    /// Database name
    pub database: String,
    /// Role name
    pub user: String,
    /// Role password
    pub password: String,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Debug for PgParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgParameters")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Where the seeder connects
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// `postgres://` connection string
    Url(String),
    /// Individual parameters from `PG_*`
    Parameters(PgParameters),
}

impl Debug for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.write_str("DatabaseConfig::Url(***)"),
            Self::Parameters(params) => f.debug_tuple("DatabaseConfig::Parameters").field(params).finish(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection target
    ///
    /// Precedence: the `--database-url` flag, then `DATABASE_URL`, then `PG_*`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required `PG_*` variable is missing, `PG_PORT` is not a
    /// port number, or the URL does not use the `postgres` scheme
    pub fn resolve(url_override: Option<String>) -> AppResult<Self> {
        match url_override.or_else(|| env::var(env_config::DATABASE_URL).ok()) {
            Some(url) => Self::from_url(url),
            None => Self::from_env(),
        }
    }

    /// Build from a connection URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not use the `postgres` scheme
    pub fn from_url(url: String) -> AppResult<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Url(url))
        } else {
            Err(AppError::config_invalid(
                "database URL must start with postgres:// or postgresql://",
            ))
        }
    }

    /// Load connection parameters from `PG_DB`, `PG_USER`, `PG_PASS`, `PG_HOST`, `PG_PORT`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is missing or `PG_PORT` is invalid
    pub fn from_env() -> AppResult<Self> {
        let database = required_var(env_config::PG_DB)?;
        let user = required_var(env_config::PG_USER)?;
        let password = required_var(env_config::PG_PASS)?;
        let host = required_var(env_config::PG_HOST)?;
        let raw_port = required_var(env_config::PG_PORT)?;
        let port = raw_port.trim().parse::<u16>().map_err(|e| {
            AppError::config_invalid(format!(
                "Invalid {} value '{raw_port}': {e}",
                env_config::PG_PORT
            ))
        })?;

        Ok(Self::Parameters(PgParameters {
            database,
            user,
            password,
            host,
            port,
        }))
    }

    /// `sqlx` connect options for this target
    ///
    /// # Errors
    ///
    /// Returns an error if the connection URL cannot be parsed
    pub fn connect_options(&self) -> AppResult<PgConnectOptions> {
        match self {
            Self::Url(url) => url.parse::<PgConnectOptions>().map_err(|e| {
                AppError::config_invalid(format!("Invalid database URL: {e}")).with_source(e)
            }),
            Self::Parameters(params) => Ok(PgConnectOptions::new()
                .host(&params.host)
                .port(params.port)
                .username(&params.user)
                .password(&params.password)
                .database(&params.database)),
        }
    }

    /// Open the pool holding the run's single connection
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or rejects the credentials
    pub async fn connect(&self) -> AppResult<PgPool> {
        let options = self.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        match self {
            Self::Url(_) => info!("Connected to database via connection URL"),
            Self::Parameters(params) => info!(
                db.host = %params.host,
                db.port = params.port,
                db.name = %params.database,
                "Connected to database"
            ),
        }
        Ok(pool)
    }
}

/// Read a variable that must be present and non-empty
fn required_var(name: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config_missing(name)),
    }
}
