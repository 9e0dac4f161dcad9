//! Runtime configuration loaded from environment variables.
//!
//! ## Required
//! - `NEONMART_ADMIN_USERNAME` / `NEONMART_ADMIN_PASSWORD` - the single
//!   admin credential pair; the server refuses to start without them
//!
//! ## Optional
//! - `NEONMART_HOST` - bind address (default: 0.0.0.0)
//! - `NEONMART_PORT` - listen port (default: 8083)
//! - `NEONMART_CART_TTL_SECS` - idle cart eviction (default: 1800)
//! - `NEONMART_SESSION_TTL_SECS` - session inactivity expiry (default: 3600)

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub admin_username: String,
    pub admin_password: SecretString,
    pub cart_ttl: Duration,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parsed("NEONMART_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parsed("NEONMART_PORT", 8083)?,
            admin_username: required("NEONMART_ADMIN_USERNAME")?,
            admin_password: SecretString::from(required("NEONMART_ADMIN_PASSWORD")?),
            cart_ttl: Duration::from_secs(parsed("NEONMART_CART_TTL_SECS", 1800)?),
            session_ttl: Duration::from_secs(parsed("NEONMART_SESSION_TTL_SECS", 3600)?),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
