use std::env;

use chrono::NaiveDate;

/// Port used when `PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 9000;

/// Day the dashboard summarizes when `DASHBOARD_REFERENCE_DATE` is unset.
/// The bundled fixtures cover 2021, so "today" is pinned inside that year.
pub const DEFAULT_REFERENCE_DATE: &str = "2021-11-15";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub reference_date: NaiveDate,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let reference_raw = lookup("DASHBOARD_REFERENCE_DATE")
            .unwrap_or_else(|| DEFAULT_REFERENCE_DATE.to_string());
        let reference_date = NaiveDate::parse_from_str(reference_raw.trim(), "%Y-%m-%d")
            .map_err(|e| ConfigError::Invalid {
                name: "DASHBOARD_REFERENCE_DATE",
                value: reference_raw.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url,
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            reference_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn port_defaults_to_9000() {
        let config = config_from(&[("DATABASE_URL", "memory://")]).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_max_connections, 10);
    }

    #[test]
    fn explicit_port_is_used() {
        let config = config_from(&[("DATABASE_URL", "memory://"), ("PORT", "5001")]).unwrap();
        assert_eq!(config.port, 5001);
    }

    #[test]
    fn garbage_port_falls_back_to_default() {
        let config = config_from(&[("DATABASE_URL", "memory://"), ("PORT", "eighty")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn database_url_is_required() {
        let err = config_from(&[("PORT", "9000")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
        assert_eq!(err.to_string(), "DATABASE_URL must be set");
    }

    #[test]
    fn blank_database_url_is_missing() {
        let err = config_from(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn reference_date_default_and_override() {
        let config = config_from(&[("DATABASE_URL", "memory://")]).unwrap();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2021, 11, 15).unwrap());

        let config = config_from(&[
            ("DATABASE_URL", "memory://"),
            ("DASHBOARD_REFERENCE_DATE", "2021-03-02"),
        ])
        .unwrap();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2021, 3, 2).unwrap());
    }

    #[test]
    fn bad_reference_date_is_rejected() {
        let err = config_from(&[
            ("DATABASE_URL", "memory://"),
            ("DASHBOARD_REFERENCE_DATE", "15/11/2021"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "DASHBOARD_REFERENCE_DATE",
                ..
            }
        ));
    }
}
