//! Bot configuration
//!
//! Loads configuration from environment variables

use anyhow::Result;
use nowplaying_core::config::{CoreConfig, SpotifyConfig};

/// Bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL, bot token and pool size
    pub core: CoreConfig,

    /// Spotify application credentials
    pub spotify: SpotifyConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            core: CoreConfig::from_env()?,
            spotify: SpotifyConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        // Verify Config implements required traits
        fn assert_clone<T: Clone>() {}
        fn assert_debug<T: std::fmt::Debug>() {}

        assert_clone::<Config>();
        assert_debug::<Config>();
    }
}
