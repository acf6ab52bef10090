//! Configuration management for the skill Lambda.

use std::env;

use crate::{Error, Result};

/// Default table holding persistent attributes.
pub const DEFAULT_ATTRIBUTES_TABLE: &str = "skill_attributes";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Expected Alexa application id; requests for other skills are rejected
    pub skill_id: Option<String>,
    /// Postgres settings; `None` keeps attributes in memory
    pub database: Option<DatabaseConfig>,
    /// AWS region
    pub aws_region: String,
}

/// Postgres connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database name
    pub name: String,
    /// ARN of the secret containing database credentials
    pub secret_arn: String,
    /// Table holding one attribute blob per user
    pub attributes_table: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_HOST") {
            Some(host) => {
                let secret_arn = lookup("DATABASE_URL_SECRET_ARN").ok_or_else(|| {
                    Error::Config(
                        "DATABASE_URL_SECRET_ARN must be set when DATABASE_HOST is set".to_string(),
                    )
                })?;

                let port = match lookup("DATABASE_PORT") {
                    Some(port) => port
                        .parse()
                        .map_err(|e| Error::Config(format!("Invalid DATABASE_PORT: {}", e)))?,
                    None => 5432,
                };

                let attributes_table = lookup("ATTRIBUTES_TABLE")
                    .unwrap_or_else(|| DEFAULT_ATTRIBUTES_TABLE.to_string());
                validate_table_name(&attributes_table)?;

                Some(DatabaseConfig {
                    host,
                    port,
                    name: lookup("DATABASE_NAME").unwrap_or_else(|| "cart_skill".to_string()),
                    secret_arn,
                    attributes_table,
                })
            }
            None => None,
        };

        Ok(Self {
            skill_id: lookup("SKILL_ID").filter(|id| !id.trim().is_empty()),
            database,
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        })
    }
}

/// The table name is spliced into SQL, so only plain identifiers are allowed.
fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!("Invalid ATTRIBUTES_TABLE: {}", name)))
    }
}
