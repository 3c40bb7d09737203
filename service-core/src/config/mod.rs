use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::{Deserialize, Deserializer};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port", deserialize_with = "lenient_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Falls back to the default port when the configured value is not a valid `u16`.
fn lenient_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(parse_port(raw.as_deref()))
}

pub fn parse_port(raw: Option<&str>) -> u16 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %value, "Invalid PORT, using default {}", DEFAULT_PORT);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::default())
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_when_absent() {
        assert_eq!(parse_port(None), 5000);
        assert_eq!(parse_port(Some("")), 5000);
    }

    #[test]
    fn port_defaults_when_unparseable() {
        assert_eq!(parse_port(Some("not-a-port")), 5000);
        assert_eq!(parse_port(Some("70000")), 5000);
        assert_eq!(parse_port(Some("-1")), 5000);
    }

    #[test]
    fn port_parses_valid_values() {
        assert_eq!(parse_port(Some("8080")), 8080);
        assert_eq!(parse_port(Some(" 3000 ")), 3000);
        assert_eq!(parse_port(Some("0")), 0);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: Config = Cfg::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("empty config should deserialize");
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn config_tolerates_bad_port() {
        let config: Config = Cfg::builder()
            .set_override("port", "abc")
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .expect("bad port should fall back");
        assert_eq!(config.port, 5000);
    }
}
