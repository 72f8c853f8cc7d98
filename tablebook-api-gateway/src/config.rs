use std::net::SocketAddr;

use chrono::TimeDelta;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8100";
pub const DEFAULT_ACCESS_TOKEN_TTL_HOURS: i64 = 8;
pub const DEFAULT_DATABASE_POOL_SIZE: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub secret_key: String,
    pub listen_addr: SocketAddr,
    pub access_token_ttl: TimeDelta,
    pub database_pool_size: usize,
}

impl Config {
    /// Reads the configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret_key = lookup("SECRET_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let listen_addr = parse_or(&lookup, "LISTEN_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8100))
        })?;
        let ttl_hours = parse_or(&lookup, "ACCESS_TOKEN_TTL_HOURS", || {
            DEFAULT_ACCESS_TOKEN_TTL_HOURS
        })?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_TTL_HOURS",
                value: ttl_hours.to_string(),
            });
        }
        let database_pool_size = parse_or(&lookup, "DATABASE_POOL_SIZE", || {
            DEFAULT_DATABASE_POOL_SIZE
        })?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            secret_key,
            listen_addr,
            access_token_ttl: TimeDelta::hours(ttl_hours),
            database_pool_size,
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("SECRET_KEY", "s3cret")])).unwrap();
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(config.access_token_ttl, TimeDelta::hours(8));
        assert_eq!(config.database_pool_size, DEFAULT_DATABASE_POOL_SIZE);
        assert_eq!(config.database_url, None);
        assert_eq!(
            config.require_database_url(),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SECRET_KEY", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/tablebook"),
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("ACCESS_TOKEN_TTL_HOURS", "1"),
            ("DATABASE_POOL_SIZE", "2"),
        ]))
        .unwrap();
        assert_eq!(
            config.require_database_url(),
            Ok("postgres://localhost/tablebook")
        );
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.access_token_ttl, TimeDelta::hours(1));
        assert_eq!(config.database_pool_size, 2);
    }

    #[test]
    fn test_rejects_missing_secret_and_bad_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("SECRET_KEY")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("SECRET_KEY", "s"), ("LISTEN_ADDR", "nowhere")]))
                .unwrap_err(),
            ConfigError::Invalid {
                name: "LISTEN_ADDR",
                value: "nowhere".to_string()
            }
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[("SECRET_KEY", "s"), ("ACCESS_TOKEN_TTL_HOURS", "0")])),
            Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_TTL_HOURS",
                ..
            })
        ));
    }
}
