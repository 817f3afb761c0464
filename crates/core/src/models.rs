//! Core domain models for Now Playing
//!
//! What a user is listening to, independent of how Spotify reports it.

use std::fmt;

/// Cover art reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Currently playing track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub artist: String, // All artists, comma separated
    pub url: String,
    pub thumbnail: Option<Thumbnail>,
}

/// Kind of collection the track is being played from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    Album,
    Playlist,
    Artist,
    Show,
    Other(String),
}

impl ContextKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::Artist => "artist",
            Self::Show => "show",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for ContextKind {
    fn from(kind: &str) -> Self {
        match kind {
            "album" => Self::Album,
            "playlist" => Self::Playlist,
            "artist" => Self::Artist,
            "show" => Self::Show,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Album, playlist or other collection enclosing the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackContext {
    pub kind: ContextKind,
    pub name: String,
    pub artist: Option<String>, // Only albums carry one
    pub url: String,
    pub thumbnail: Option<Thumbnail>,
}

/// Snapshot of a user's player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub song: Option<Song>,
    pub context: Option<PlaybackContext>,
}

impl PlaybackStatus {
    /// Nothing is playing
    pub const fn idle() -> Self {
        Self {
            song: None,
            context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_kind_round_trips_spotify_type() {
        assert_eq!(ContextKind::from("album"), ContextKind::Album);
        assert_eq!(ContextKind::from("playlist").as_str(), "playlist");
        assert_eq!(
            ContextKind::from("collection"),
            ContextKind::Other("collection".to_string())
        );
        assert_eq!(ContextKind::from("collection").to_string(), "collection");
    }

    #[test]
    fn test_idle_status() {
        assert!(PlaybackStatus::idle().song.is_none());
        assert_eq!(PlaybackStatus::default(), PlaybackStatus::idle());
    }
}
