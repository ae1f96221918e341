//! Worker configuration loaded from environment variables.

use crate::project::domain::{ExpirationPolicy, ProjectDomainError};
use std::time::Duration;
use thiserror::Error;

const DATABASE_URL: &str = "DATABASE_URL";
const MAX_WORK_DEADLINE_EXPIRATION_DAYS: &str = "MAX_WORK_DEADLINE_EXPIRATION_DAYS";
const RECONCILE_INTERVAL_SECS: &str = "LIFECYCLE_RECONCILE_INTERVAL_SECS";
const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";

const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60;
const DEFAULT_DATABASE_POOL_SIZE: u32 = 4;

/// Errors returned while loading worker configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed.
    #[error("{key} has invalid value '{value}'")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// A variable must be greater than zero.
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    /// The expiration grace period is invalid.
    #[error(transparent)]
    Policy(#[from] ProjectDomainError),
}

/// Configuration for the lifecycle reconciliation worker.
///
/// | Env Var                              | Default |
/// |--------------------------------------|---------|
/// | `DATABASE_URL`                       | required|
/// | `MAX_WORK_DEADLINE_EXPIRATION_DAYS`  | `30`    |
/// | `LIFECYCLE_RECONCILE_INTERVAL_SECS`  | `60`    |
/// | `DATABASE_POOL_SIZE`                 | `4`     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Grace period before expired projects are cancelled.
    pub expiration_policy: ExpirationPolicy,
    /// Time between reconciliation runs.
    pub reconcile_interval: Duration,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
}

impl WorkerConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value
    /// when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;

        let expiration_days = parse_positive(
            &lookup,
            MAX_WORK_DEADLINE_EXPIRATION_DAYS,
            ExpirationPolicy::DEFAULT_MAX_WORK_DEADLINE_EXPIRATION_DAYS,
        )?;
        let interval_secs = parse_positive(
            &lookup,
            RECONCILE_INTERVAL_SECS,
            DEFAULT_RECONCILE_INTERVAL_SECS,
        )?;
        let pool_size = parse_positive(&lookup, DATABASE_POOL_SIZE, DEFAULT_DATABASE_POOL_SIZE)?;

        Ok(Self {
            database_url,
            expiration_policy: ExpirationPolicy::new(expiration_days)?,
            reconcile_interval: Duration::from_secs(interval_secs),
            pool_size,
        })
    }
}

fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.clone(),
    })?;
    if value == T::default() {
        return Err(ConfigError::NotPositive(key));
    }
    Ok(value)
}
