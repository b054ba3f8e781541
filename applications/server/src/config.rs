/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Ten years
const MAX_JWT_EXPIRATION_HOURS: u64 = 87_600;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_scheduler")]
    pub scheduler: SchedulerSettings,

    #[serde(default = "default_votes")]
    pub votes: VoteSettings,

    #[serde(default = "default_events")]
    pub events: EventSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often due playlists are checked
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl SchedulerSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoteSettings {
    /// Whether one user may vote for the same track more than once
    #[serde(default = "default_enabled")]
    pub allow_repeat_votes: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventSettings {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `config.toml` in the working directory; a missing
    /// default file is fine, a missing explicit one is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                settings = settings.add_source(
                    config::File::new("config.toml", config::FileFormat::Toml).required(false),
                );
            }
        }

        // Override with environment variables (JUKEBOX_AUTH__JWT_SECRET, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("JUKEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set JUKEBOX_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.auth.jwt_expiration_hours) {
            return Err(ServerError::Config(format!(
                "auth.jwt_expiration_hours must be between 1 and {MAX_JWT_EXPIRATION_HOURS}"
            )));
        }

        if self.scheduler.tick_interval_ms == 0 {
            return Err(ServerError::Config(
                "scheduler.tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(ServerError::Config(
                "events.channel_capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn vote_policy(&self) -> jukebox_core::VotePolicy {
        jukebox_core::VotePolicy {
            allow_repeat_votes: self.votes.allow_repeat_votes,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/jukebox.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_scheduler() -> SchedulerSettings {
    SchedulerSettings {
        enabled: default_enabled(),
        tick_interval_ms: default_tick_interval_ms(),
    }
}

fn default_enabled() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    500
}

fn default_votes() -> VoteSettings {
    VoteSettings {
        allow_repeat_votes: default_enabled(),
    }
}

fn default_events() -> EventSettings {
    EventSettings {
        channel_capacity: default_channel_capacity(),
    }
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            scheduler: default_scheduler(),
            votes: default_votes(),
            events: default_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.scheduler.tick_interval(), Duration::from_millis(500));
        assert!(config.votes.allow_repeat_votes);
        assert_eq!(config.events.channel_capacity, 1024);
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(ServerConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn zero_interval_and_capacity_are_rejected() {
        let mut config = valid();
        config.scheduler.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.events.channel_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [auth]
            jwt_secret = "s"

            [votes]
            allow_repeat_votes = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(!config.vote_policy().allow_repeat_votes);
        assert!(config.scheduler.enabled);
    }
}
