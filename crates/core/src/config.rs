//! Shared configuration logic
//!
//! Handles loading of common environment variables.

use crate::error::ConfigError;
use std::env;
use url::Url;

/// Common configuration used across services
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Database connection URL
    pub database_url: String,

    /// Telegram bot token
    pub telegram_bot_token: String,

    /// Maximum database connections (default: 20)
    pub db_max_connections: u32,
}

impl CoreConfig {
    /// Load common configuration from environment variables
    ///
    /// This will also initialize dotenv if it hasn't been done yet.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".to_string()))?,
            db_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
        })
    }
}

/// Spotify application credentials
///
/// Every field is optional: a bot without credentials still starts, it
/// just cannot hand out login links.
#[derive(Debug, Clone, Default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<Url>,
}

impl SpotifyConfig {
    /// Load Spotify credentials from `SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_REDIRECT_URI`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let redirect_uri = match non_empty_var("SPOTIFY_REDIRECT_URI") {
            Some(raw) => Some(Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
                name: "SPOTIFY_REDIRECT_URI".to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            client_id: non_empty_var("SPOTIFY_CLIENT_ID"),
            client_secret: non_empty_var("SPOTIFY_CLIENT_SECRET"),
            redirect_uri,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
