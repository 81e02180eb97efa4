//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use likebot_core::validate_reaction_label;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    /// Absent when conversation state is kept in process
    pub redis: Option<RedisConfig>,
    pub snowflake: SnowflakeConfig,
    pub bot: BotConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

/// Reaction and posting behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Buttons a new chat starts with
    pub default_buttons: Vec<String>,
    /// Hard cap of distinct buttons on one message
    pub max_distinct_buttons: usize,
    pub max_buttons_per_row: usize,
    pub publish_ttl_secs: u64,
    pub reaction_ttl_secs: u64,
    pub admin_cache_ttl_secs: u64,
    pub notification_timeout_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            default_buttons: default_buttons(),
            max_distinct_buttons: 40,
            max_buttons_per_row: 5,
            publish_ttl_secs: 3600, // 1 hour
            reaction_ttl_secs: 600,
            admin_cache_ttl_secs: 60,
            notification_timeout_ms: 5000,
        }
    }
}

impl BotConfig {
    #[must_use]
    pub fn publish_ttl(&self) -> Duration {
        Duration::from_secs(self.publish_ttl_secs)
    }

    #[must_use]
    pub fn reaction_ttl(&self) -> Duration {
        Duration::from_secs(self.reaction_ttl_secs)
    }

    #[must_use]
    pub fn admin_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.admin_cache_ttl_secs)
    }

    #[must_use]
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_distinct_buttons == 0 {
            return Err(ConfigError::InvalidValue(
                "BOT_MAX_DISTINCT_BUTTONS",
                "must be at least 1".to_string(),
            ));
        }
        if self.default_buttons.len() > self.max_distinct_buttons {
            return Err(ConfigError::InvalidValue(
                "BOT_DEFAULT_BUTTONS",
                format!("more than {} buttons", self.max_distinct_buttons),
            ));
        }
        for label in &self.default_buttons {
            validate_reaction_label(label)
                .map_err(|_| ConfigError::InvalidValue("BOT_DEFAULT_BUTTONS", label.clone()))?;
        }
        if self.notification_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "BOT_NOTIFICATION_TIMEOUT_MS",
                "must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// Default value functions
fn default_app_name() -> String {
    "likebot".to_string()
}

fn default_buttons() -> Vec<String> {
    vec!["👍".to_string(), "👎".to_string()]
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(default),
    }
}

fn parse_labels(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in raw.split([',', ' ']).map(str::trim).filter(|l| !l.is_empty()) {
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a numeric value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let redis = match lookup("REDIS_URL").filter(|url| !url.is_empty()) {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: parse_or(
                    &lookup,
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections(),
                )?,
            }),
            None => None,
        };

        let defaults = BotConfig::default();
        let bot = BotConfig {
            default_buttons: lookup("BOT_DEFAULT_BUTTONS")
                .map(|raw| parse_labels(&raw))
                .unwrap_or(defaults.default_buttons),
            max_distinct_buttons: parse_or(
                &lookup,
                "BOT_MAX_DISTINCT_BUTTONS",
                defaults.max_distinct_buttons,
            )?,
            max_buttons_per_row: parse_or(
                &lookup,
                "BOT_MAX_BUTTONS_PER_ROW",
                defaults.max_buttons_per_row,
            )?,
            publish_ttl_secs: parse_or(&lookup, "BOT_PUBLISH_TTL_SECS", defaults.publish_ttl_secs)?,
            reaction_ttl_secs: parse_or(
                &lookup,
                "BOT_REACTION_TTL_SECS",
                defaults.reaction_ttl_secs,
            )?,
            admin_cache_ttl_secs: parse_or(
                &lookup,
                "BOT_ADMIN_CACHE_TTL_SECS",
                defaults.admin_cache_ttl_secs,
            )?,
            notification_timeout_ms: parse_or(
                &lookup,
                "BOT_NOTIFICATION_TIMEOUT_MS",
                defaults.notification_timeout_ms,
            )?,
        };
        bot.validate()?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections(),
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections(),
                )?,
            },
            redis,
            snowflake: SnowflakeConfig {
                worker_id: parse_or(&lookup, "WORKER_ID", 0)?,
            },
            bot,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/likebot")]).unwrap();
        assert_eq!(config.app.name, "likebot");
        assert_eq!(config.app.env, Environment::Development);
        assert!(config.redis.is_none());
        assert_eq!(config.snowflake.worker_id, 0);
        assert_eq!(config.bot, BotConfig::default());
        assert_eq!(config.bot.publish_ttl(), Duration::from_secs(3600));
        assert_eq!(config.bot.default_buttons, vec!["👍", "👎"]);
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::MissingVar("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/likebot"),
            ("BOT_MAX_DISTINCT_BUTTONS", "lots"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue("BOT_MAX_DISTINCT_BUTTONS", ref v) if v == "lots"
        ));
    }

    #[test]
    fn test_bot_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/likebot"),
            ("REDIS_URL", "redis://localhost"),
            ("APP_ENV", "Production"),
            ("BOT_DEFAULT_BUTTONS", "🔥, 😂,🔥"),
            ("BOT_MAX_DISTINCT_BUTTONS", "10"),
            ("BOT_NOTIFICATION_TIMEOUT_MS", "250"),
        ])
        .unwrap();
        assert!(config.app.env.is_production());
        assert_eq!(config.redis.map(|r| r.max_connections), Some(10));
        assert_eq!(config.bot.default_buttons, vec!["🔥", "😂"]);
        assert_eq!(config.bot.max_distinct_buttons, 10);
        assert_eq!(config.bot.notification_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_default_buttons_must_be_emoji() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/likebot"),
            ("BOT_DEFAULT_BUTTONS", "yes,no"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("BOT_DEFAULT_BUTTONS", _)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let bot = BotConfig {
            max_distinct_buttons: 0,
            ..BotConfig::default()
        };
        assert!(bot.validate().is_err());
    }
}
