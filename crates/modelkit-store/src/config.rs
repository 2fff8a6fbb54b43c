//! Database configuration from the environment
//!
//! Five variables are required: `DB_USER`, `DB_PASS`, `DB_HOST`, `DB_PORT`
//! and `DB_NAME`. `DB_PROTOCOL` is optional and defaults to `sqlite`. A
//! `.env` file in the working directory is loaded first; variables already
//! set in the process environment win.
//!
//! Loading fails fast: a missing variable is a `Configuration` error at
//! startup, never a deferred connection failure.

use modelkit_core_types::Sensitive;

use crate::errors::{config_error, Result};

pub const ENV_PROTOCOL: &str = "DB_PROTOCOL";
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASS: &str = "DB_PASS";
pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_PORT: &str = "DB_PORT";
pub const ENV_NAME: &str = "DB_NAME";

pub const DEFAULT_PROTOCOL: &str = "sqlite";

/// Database name that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub protocol: String,
    pub user: String,
    pub password: Sensitive<String>,
    pub host: String,
    pub port: u16,
    /// Database name; the embedded engine opens it as a file path
    pub name: String,
}

impl DatabaseConfig {
    /// Load from the process environment, after seeding it from `.env`
    ///
    /// # Errors
    /// * `Configuration` - a required variable is missing, empty or malformed
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    ///
    /// # Errors
    /// * `Configuration` - a required variable is missing, empty or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                Some(_) => Err(config_error(key, "is empty")),
                None => Err(config_error(key, "is not set")),
            }
        };

        let user = required(ENV_USER)?;
        let password = Sensitive::new(required(ENV_PASS)?);
        let host = required(ENV_HOST)?;
        let port = required(ENV_PORT)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| config_error(ENV_PORT, &format!("'{}' is not a valid port", port)))?;
        let name = required(ENV_NAME)?;

        let protocol = lookup(ENV_PROTOCOL)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());

        Ok(Self {
            protocol,
            user,
            password,
            host,
            port,
            name,
        })
    }

    /// `<protocol>://<user>:<pass>@<host>:<port>/<name>`
    pub fn connection_string(&self) -> Sensitive<String> {
        let (user, host, port, name) = (&self.user, &self.host, self.port, &self.name);
        self.password
            .clone()
            .map(|pass| format!("{}://{}:{}@{}:{}/{}", self.protocol, user, pass, host, port, name))
    }

    /// Connection string with the password masked, safe for logs
    pub fn redacted_connection_string(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.protocol, self.user, self.password, self.host, self.port, self.name
        )
    }

    pub fn is_in_memory(&self) -> bool {
        self.name == IN_MEMORY
    }
}
