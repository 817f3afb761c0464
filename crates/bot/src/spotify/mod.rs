//! Spotify collaborators
//!
//! `SpotifyClient` is the per-user player handle the handlers talk to;
//! `SpotifyOAuth` holds the application credentials used to build login
//! links. The token exchange behind the redirect URI is not part of the bot.

mod web;

pub use web::WebSpotifyClient;

use async_trait::async_trait;
use nowplaying_core::config::SpotifyConfig;
use nowplaying_core::{PlaybackStatus, SpotifyError};
use url::Url;

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Permissions requested from the user
pub const SCOPES: [&str; 3] = [
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
];

/// Per-user Spotify session
#[async_trait]
pub trait SpotifyClient: Send + Sync {
    /// What the user is currently listening to
    async fn status(&self) -> Result<PlaybackStatus, SpotifyError>;

    /// Append a track to the user's playback queue
    async fn add_to_queue(&self, track_id: &str) -> Result<(), SpotifyError>;
}

/// Application-level OAuth settings
#[derive(Debug, Clone, Default)]
pub struct SpotifyOAuth {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<Url>,
}

impl SpotifyOAuth {
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: Option<Url>,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    pub fn from_config(config: &SpotifyConfig) -> Self {
        Self::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri.clone(),
        )
    }

    /// Whether every credential needed to complete a login is configured
    pub const fn is_oauth_ready(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.redirect_uri.is_some()
    }

    /// Authorization link that sends `state` back to the redirect URI
    ///
    /// Returns `None` when the client id or redirect URI is missing.
    pub fn auth_uri(&self, state: &str) -> Option<Url> {
        let client_id = self.client_id.as_deref()?;
        let redirect_uri = self.redirect_uri.as_ref()?;

        let mut url = Url::parse(AUTHORIZE_URL).ok()?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", state);

        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SpotifyOAuth {
        SpotifyOAuth::new(
            Some("client-id".to_string()),
            Some("client-secret".to_string()),
            Url::parse("https://example.com/spotify/callback").ok(),
        )
    }

    #[test]
    fn test_oauth_ready_requires_all_credentials() {
        assert!(configured().is_oauth_ready());
        assert!(!SpotifyOAuth::default().is_oauth_ready());

        let no_secret = SpotifyOAuth::new(
            Some("client-id".to_string()),
            None,
            Url::parse("https://example.com/spotify/callback").ok(),
        );
        assert!(!no_secret.is_oauth_ready());
    }

    #[test]
    fn test_auth_uri_carries_state() {
        let url = configured().auth_uri("123456789").unwrap();
        assert_eq!(url.host_str(), Some("accounts.spotify.com"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("state".to_string(), "123456789".to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "https://example.com/spotify/callback".to_string()
        )));
        assert!(pairs.contains(&("scope".to_string(), SCOPES.join(" "))));
    }

    #[test]
    fn test_auth_uri_without_credentials() {
        assert!(SpotifyOAuth::default().auth_uri("1").is_none());
    }
}
