//! Spotify Web API adapter
//!
//! Covers exactly the three calls the bot needs: the currently playing
//! track, the collection it is played from, and queue-add.

use super::SpotifyClient;
use async_trait::async_trait;
use nowplaying_core::{ContextKind, PlaybackContext, PlaybackStatus, Song, SpotifyError, Thumbnail};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use url::Url;

const API_HOST: &str = "api.spotify.com";
const API_BASE: &str = "https://api.spotify.com/v1/";

/// Spotify client authenticated with one user's access token
#[derive(Clone)]
pub struct WebSpotifyClient {
    http: Client,
    access_token: String,
}

impl fmt::Debug for WebSpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSpotifyClient")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl WebSpotifyClient {
    pub fn new(http: Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    fn endpoint(path: &str) -> Result<Url, SpotifyError> {
        Url::parse(&format!("{API_BASE}{path}"))
            .map_err(|e| SpotifyError::api(format!("Invalid endpoint {path}: {e}")))
    }

    async fn get(&self, url: Url) -> Result<Response, SpotifyError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await
    }

    /// Resolve the enclosing album/playlist; failures only cost the second card
    async fn context(&self, context: &ContextObject) -> Option<PlaybackContext> {
        let href = context.href.as_deref()?;

        match self.fetch_context(href, &context.kind).await {
            Ok(details) => context_from(&context.kind, details),
            Err(e) => {
                tracing::warn!("Failed to load {} context {}: {}", context.kind, href, e);
                None
            }
        }
    }

    async fn fetch_context(&self, href: &str, kind: &str) -> Result<ContextDetails, SpotifyError> {
        let mut url =
            Url::parse(href).map_err(|e| SpotifyError::api(format!("Invalid context href: {e}")))?;

        // The token must only ever be sent to the Web API host
        if url.host_str() != Some(API_HOST) {
            return Err(SpotifyError::api(format!("Unexpected context host: {href}")));
        }

        if kind == "playlist" {
            url.query_pairs_mut()
                .append_pair("fields", "name,images,external_urls");
        }

        self.get(url).await?.json().await.map_err(transport_error)
    }
}

#[async_trait]
impl SpotifyClient for WebSpotifyClient {
    async fn status(&self) -> Result<PlaybackStatus, SpotifyError> {
        let mut url = Self::endpoint("me/player/currently-playing")?;
        url.query_pairs_mut().append_pair("additional_types", "track");

        let response = self.get(url).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(PlaybackStatus::idle());
        }

        let playing: CurrentlyPlaying = response.json().await.map_err(transport_error)?;

        let Some(song) = playing.item.and_then(song_from) else {
            tracing::debug!("Player reports an item without id or url");
            return Ok(PlaybackStatus::idle());
        };

        let context = match &playing.context {
            Some(context) => self.context(context).await,
            None => None,
        };

        Ok(PlaybackStatus {
            song: Some(song),
            context,
        })
    }

    async fn add_to_queue(&self, track_id: &str) -> Result<(), SpotifyError> {
        let mut url = Self::endpoint("me/player/queue")?;
        url.query_pairs_mut()
            .append_pair("uri", &format!("spotify:track:{track_id}"));

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await?;
        Ok(())
    }
}

/// Map non-success responses onto the two error kinds
async fn check_status(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(SpotifyError::Auth);
    }

    let message = response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(|envelope| envelope.error.message);

    Err(SpotifyError::Api {
        message: message.or_else(|| Some(status.to_string())),
    })
}

fn transport_error(err: reqwest::Error) -> SpotifyError {
    SpotifyError::api(err.to_string())
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlaying {
    item: Option<TrackObject>,
    context: Option<ContextObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: Option<String>, // null for local files
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    #[serde(default)]
    external_urls: ExternalUrls,
    album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    images: Option<Vec<ImageObject>>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContextObject {
    #[serde(rename = "type")]
    kind: String,
    href: Option<String>,
}

/// Album, playlist or artist object behind a context href
#[derive(Debug, Deserialize)]
struct ContextDetails {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    images: Option<Vec<ImageObject>>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn join_artists(artists: &[ArtistObject]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Smallest image, which is what an inline result thumbnail wants
fn thumbnail(images: Option<&[ImageObject]>) -> Option<Thumbnail> {
    images?
        .iter()
        .min_by_key(|image| image.width.unwrap_or(u32::MAX))
        .map(|image| Thumbnail {
            url: image.url.clone(),
            width: image.width,
            height: image.height,
        })
}

fn song_from(track: TrackObject) -> Option<Song> {
    let id = track.id?;
    let url = track.external_urls.spotify?;
    let thumbnail = track
        .album
        .as_ref()
        .and_then(|album| thumbnail(album.images.as_deref()));

    Some(Song {
        id,
        artist: join_artists(&track.artists),
        name: track.name,
        url,
        thumbnail,
    })
}

fn context_from(kind: &str, details: ContextDetails) -> Option<PlaybackContext> {
    let url = details.external_urls.spotify?;
    let kind = ContextKind::from(kind);
    let artist = (kind == ContextKind::Album && !details.artists.is_empty())
        .then(|| join_artists(&details.artists));

    Some(PlaybackContext {
        kind,
        name: details.name,
        artist,
        url,
        thumbnail: thumbnail(details.images.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_json() -> serde_json::Value {
        json!({
            "id": "4uLU6hMCjMI75M1A2tKUQC",
            "name": "Never Gonna Give You Up",
            "artists": [{ "name": "Rick Astley" }, { "name": "Guest" }],
            "external_urls": { "spotify": "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC" },
            "album": {
                "images": [
                    { "url": "https://i.scdn.co/image/large", "width": 640, "height": 640 },
                    { "url": "https://i.scdn.co/image/small", "width": 64, "height": 64 },
                    { "url": "https://i.scdn.co/image/medium", "width": 300, "height": 300 }
                ]
            }
        })
    }

    #[test]
    fn test_currently_playing_track_maps_to_song() {
        let playing: CurrentlyPlaying = serde_json::from_value(json!({
            "is_playing": true,
            "item": track_json(),
            "context": null
        }))
        .unwrap();

        assert!(playing.context.is_none());
        let song = song_from(playing.item.unwrap()).unwrap();
        assert_eq!(song.id, "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(song.artist, "Rick Astley, Guest");
        assert_eq!(
            song.thumbnail,
            Some(Thumbnail {
                url: "https://i.scdn.co/image/small".to_string(),
                width: Some(64),
                height: Some(64),
            })
        );
    }

    #[test]
    fn test_local_track_without_id_is_skipped() {
        let mut track = track_json();
        track["id"] = serde_json::Value::Null;
        let track: TrackObject = serde_json::from_value(track).unwrap();
        assert!(song_from(track).is_none());
    }

    #[test]
    fn test_album_context_keeps_artist() {
        let details: ContextDetails = serde_json::from_value(json!({
            "name": "Whenever You Need Somebody",
            "artists": [{ "name": "Rick Astley" }],
            "images": [],
            "external_urls": { "spotify": "https://open.spotify.com/album/6XhjNHCyCDyyGJRM5mg40G" }
        }))
        .unwrap();

        let context = context_from("album", details).unwrap();
        assert_eq!(context.kind, ContextKind::Album);
        assert_eq!(context.artist.as_deref(), Some("Rick Astley"));
        assert!(context.thumbnail.is_none());
    }

    #[test]
    fn test_playlist_context_has_no_artist_and_tolerates_null_images() {
        let details: ContextDetails = serde_json::from_value(json!({
            "name": "Road trip",
            "images": null,
            "external_urls": { "spotify": "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M" }
        }))
        .unwrap();

        let context = context_from("playlist", details).unwrap();
        assert_eq!(context.kind, ContextKind::Playlist);
        assert_eq!(context.artist, None);
    }

    #[test]
    fn test_error_body_message() {
        let envelope: ErrorEnvelope = serde_json::from_value(json!({
            "error": { "status": 404, "message": "Player command failed: No active device found", "reason": "NO_ACTIVE_DEVICE" }
        }))
        .unwrap();

        assert_eq!(
            envelope.error.message.as_deref(),
            Some("Player command failed: No active device found")
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = WebSpotifyClient::new(Client::new(), "secret-token");
        assert!(!format!("{client:?}").contains("secret-token"));
    }
}
