//! Application configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use user_function_sdk::Revision;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// Port for the function endpoint
    pub port: u16,

    /// SQLite database file holding the `users` table
    pub database_path: PathBuf,

    /// Route the function is mounted on
    pub route: String,

    /// Which revision of the function to serve
    pub revision: Revision,

    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::defaults();

        Self {
            bind_addr: lookup("USER_FUNCTION_BIND_ADDR").unwrap_or(defaults.bind_addr),

            port: parsed(&lookup, "USER_FUNCTION_PORT").unwrap_or(defaults.port),

            database_path: lookup("USER_FUNCTION_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            route: lookup("USER_FUNCTION_ROUTE")
                .map(|route| normalize_route(&route))
                .unwrap_or(defaults.route),

            revision: parsed(&lookup, "USER_FUNCTION_REVISION").unwrap_or(defaults.revision),

            max_body_bytes: parsed(&lookup, "USER_FUNCTION_MAX_BODY_BYTES")
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    fn defaults() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 7071,
            database_path: PathBuf::from("./data/users.db"),
            route: "/api/HttpExample".to_string(),
            revision: Revision::default(),
            max_body_bytes: 1024 * 1024,
        }
    }

    /// `host:port` for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.listen_addr(), "0.0.0.0:7071");
        assert_eq!(config.route, "/api/HttpExample");
        assert_eq!(config.revision, Revision::Full);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.database_path, PathBuf::from("./data/users.db"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("USER_FUNCTION_PORT", "8080"),
            ("USER_FUNCTION_ROUTE", "users/"),
            ("USER_FUNCTION_REVISION", "greeting"),
            ("USER_FUNCTION_DATABASE_PATH", "/tmp/u.db"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.route, "/users");
        assert_eq!(config.revision, Revision::Greeting);
        assert_eq!(config.database_path, PathBuf::from("/tmp/u.db"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[
            ("USER_FUNCTION_PORT", "not-a-port"),
            ("USER_FUNCTION_REVISION", "7"),
            ("USER_FUNCTION_MAX_BODY_BYTES", "-1"),
        ]);
        assert_eq!(config.port, 7071);
        assert_eq!(config.revision, Revision::Full);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }
}
