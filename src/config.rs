use std::str::FromStr;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9500;
pub const DEFAULT_PORT_RETRIES: u16 = 5;
pub const DEFAULT_EVENTS_CHANNEL: &str = "notifications:events";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime configuration read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Number of consecutive ports tried when binding fails
    pub port_retries: u16,
    pub redis_url: Option<String>,
    pub events_channel: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            port_retries: DEFAULT_PORT_RETRIES,
            redis_url: None,
            events_channel: DEFAULT_EVENTS_CHANNEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", non_empty("PORT"), defaults.port)?,
            port_retries: parse_or(
                "PORT_RETRIES",
                non_empty("PORT_RETRIES"),
                defaults.port_retries,
            )?,
            redis_url: non_empty("REDIS_URL"),
            events_channel: non_empty("NOTIFICATION_EVENTS_CHANNEL")
                .unwrap_or(defaults.events_channel),
        })
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
