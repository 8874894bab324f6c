//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `playguard.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use playguard_adapter_time_control::TimeControlConfig;
use playguard_domain::notice::Language;
use playguard_domain::time::TimeOfDay;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
    /// Player selection, default window and notice language.
    pub time_control: TimeControlSection,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Per-integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Enable the simulated players.
    pub virtual_enabled: bool,
    /// Names of the simulated players.
    pub virtual_players: Vec<String>,
}

/// `[time_control]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimeControlSection {
    /// Language tag of the spoken notices (`en`, `de`, …).
    pub language: String,
    pub keywords: Vec<String>,
    pub integrations: Vec<String>,
    /// Window start for players seen for the first time (`HH:MM`).
    pub default_start: String,
    /// Window end for players seen for the first time (`HH:MM`).
    pub default_end: String,
}

impl Config {
    /// Load configuration from `playguard.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("playguard.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("PLAYGUARD_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("PLAYGUARD_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("PLAYGUARD_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("PLAYGUARD_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("PLAYGUARD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("PLAYGUARD_LANGUAGE") {
            self.time_control.language = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.time_control.window()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl TimeControlSection {
    fn window(&self) -> Result<(TimeOfDay, TimeOfDay), ConfigError> {
        let parse = |field: &'static str, value: &str| {
            value
                .parse::<TimeOfDay>()
                .map_err(|err| ConfigError::Validation(format!("time_control.{field}: {err}")))
        };
        Ok((
            parse("default_start", &self.default_start)?,
            parse("default_end", &self.default_end)?,
        ))
    }

    /// Notice language; unknown tags fall back to English.
    #[must_use]
    pub fn language(&self) -> Language {
        Language::from_tag(&self.language)
    }

    /// Discovery settings for the time control integration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a default time is malformed.
    pub fn to_integration_config(&self) -> Result<TimeControlConfig, ConfigError> {
        let (default_start, default_end) = self.window()?;
        Ok(TimeControlConfig {
            keywords: self.keywords.clone(),
            integrations: self.integrations.clone(),
            default_start,
            default_end,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:playguard.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "playguard=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: true,
            virtual_players: playguard_adapter_virtual::DEFAULT_PLAYERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Default for TimeControlSection {
    fn default() -> Self {
        let defaults = TimeControlConfig::default();
        Self {
            language: Language::default().as_str().to_string(),
            keywords: defaults.keywords,
            integrations: defaults.integrations,
            default_start: defaults.default_start.to_string(),
            default_end: defaults.default_end.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:playguard.db?mode=rwc");
        assert!(config.integrations.virtual_enabled);
        assert_eq!(
            config.integrations.virtual_players,
            vec!["Kitchen Echo", "Bedroom Echo"]
        );
        assert_eq!(config.time_control.language(), Language::En);
        assert_eq!(config.time_control.default_start, "08:00");
        assert_eq!(config.time_control.default_end, "20:00");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [integrations]
            virtual_enabled = false
            virtual_players = ['Living Room']

            [time_control]
            language = 'de-DE'
            keywords = ['speaker']
            integrations = []
            default_start = '07:30'
            default_end = '19:00:00'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.integrations.virtual_enabled);
        assert_eq!(config.integrations.virtual_players, vec!["Living Room"]);
        assert_eq!(config.time_control.language(), Language::De);

        let tc = config.time_control.to_integration_config().unwrap();
        assert_eq!(tc.keywords, vec!["speaker"]);
        assert!(tc.integrations.is_empty());
        assert_eq!(tc.default_start, TimeOfDay::from_hm(7, 30));
        assert_eq!(tc.default_end, TimeOfDay::from_hm(19, 0));
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_malformed_default_time() {
        let mut config = Config::default();
        config.time_control.default_end = "25:00".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("time_control.default_end"));
    }

    #[test]
    fn should_fall_back_to_english_for_unknown_language() {
        let mut config = Config::default();
        config.time_control.language = "fr".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_control.language(), Language::En);
    }

    #[test]
    fn should_apply_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PLAYGUARD_BIND", "127.0.0.1:8123"),
            ("PLAYGUARD_DATABASE_URL", "sqlite::memory:"),
            ("PLAYGUARD_LOG", "debug"),
            ("PLAYGUARD_LANGUAGE", "de"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();

        config.apply_overrides(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.bind_addr(), "127.0.0.1:8123");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.time_control.language(), Language::De);
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PLAYGUARD_PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite:playguard.db?mode=rwc");
        assert!(config.integrations.virtual_enabled);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
