use rust_decimal::Decimal;
use std::{env, net::SocketAddr, time::Duration};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GOAL: i64 = 5000;
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub default_goal: Decimal,
    pub session_idle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_goal: Decimal::from(DEFAULT_GOAL),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; unset names keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a port number",
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("GYM_DEFAULT_GOAL") {
            config.default_goal = value
                .trim()
                .parse::<Decimal>()
                .ok()
                .filter(|goal| *goal > Decimal::ZERO)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "GYM_DEFAULT_GOAL",
                    expected: "a positive amount",
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup("GYM_SESSION_IDLE_MINUTES") {
            let minutes = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "GYM_SESSION_IDLE_MINUTES",
                    expected: "a positive number of minutes",
                    value: value.clone(),
                })?;
            config.session_idle = Duration::from_secs(minutes * 60);
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
