//! Error types for Now Playing core domain logic

use thiserror::Error;

/// Failures reported by the Spotify Web API adapter
///
/// The two kinds are disjoint: `Auth` means the stored credentials are
/// invalid or expired, `Api` covers every other backend-reported failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpotifyError {
    #[error("Spotify authorization failed")]
    Auth,

    #[error("Spotify API error: {}", message.as_deref().unwrap_or("no details"))]
    Api { message: Option<String> },
}

impl SpotifyError {
    /// API error carrying a human-readable message
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: Some(message.into()),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Errors decoding inline button payloads
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CallbackDataError {
    #[error("Callback data is empty")]
    Empty,

    #[error("Callback data has no action tag: {0}")]
    MissingAction(String),

    #[error("Unknown callback action: {0}")]
    UnknownAction(String),

    #[error("Track id is not valid percent-encoded UTF-8: {0}")]
    InvalidTrackId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            SpotifyError::api("Premium required").to_string(),
            "Spotify API error: Premium required"
        );
        assert_eq!(
            SpotifyError::Api { message: None }.to_string(),
            "Spotify API error: no details"
        );
    }
}
