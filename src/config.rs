use anyhow::{Context, Result};
use std::convert::Infallible;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Name of the environment that exposes internal failure detail
pub const DEV_ENVIRONMENT: &str = "dev";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Deployment mode, fixed at startup.
///
/// Only the exact name `dev` counts as the development environment; every
/// other name is treated as production-like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    name: String,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn dev() -> Self {
        Self::new(DEV_ENVIRONMENT)
    }

    pub fn is_dev(&self) -> bool {
        self.name == DEV_ENVIRONMENT
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new("prod")
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV") {
            Some(name) if !name.trim().is_empty() => name.parse()?,
            _ => Environment::default(),
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("API_PORT")
                    .unwrap_or_else(|| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
            environment,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
