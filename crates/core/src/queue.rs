//! User-facing outcome of a queue-add request

use crate::error::SpotifyError;

/// Why adding a track to the queue failed, as far as the user is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueFailure {
    /// Credentials are invalid or expired; the user has to log in again
    Unauthorized,
    NoActiveDevice,
    RestrictedDevice,
    PremiumRequired,
    /// Anything not recognised below
    Other,
}

/// Known Spotify error phrases, in increasing priority
const KNOWN_PHRASES: [(&str, QueueFailure); 3] = [
    ("No active device found", QueueFailure::NoActiveDevice),
    ("Restricted device", QueueFailure::RestrictedDevice),
    ("Premium required", QueueFailure::PremiumRequired),
];

impl QueueFailure {
    /// Map a free-text Spotify API error message onto a known failure.
    ///
    /// Spotify only exposes these conditions through the `message` text of
    /// its error body, so this is substring matching and will silently fall
    /// back to [`QueueFailure::Other`] if Spotify rewords a message. When
    /// several phrases match, the later entry in `KNOWN_PHRASES` wins.
    pub fn classify(message: Option<&str>) -> Self {
        let Some(message) = message else {
            return Self::Other;
        };

        KNOWN_PHRASES
            .iter()
            .rev()
            .find(|(phrase, _)| message.contains(phrase))
            .map_or(Self::Other, |(_, failure)| *failure)
    }

    /// Text shown to the user for this failure
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Unauthorized => "Authorization needed, please login again.",
            Self::NoActiveDevice => "No active device found",
            Self::RestrictedDevice => "Your device is not supported",
            Self::PremiumRequired => "This requires Spotify Premium",
            Self::Other => "An error occurred",
        }
    }

    /// Whether the reply should block the user with an alert instead of a toast
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<&SpotifyError> for QueueFailure {
    fn from(err: &SpotifyError) -> Self {
        match err {
            SpotifyError::Auth => Self::Unauthorized,
            SpotifyError::Api { message } => Self::classify(message.as_deref()),
        }
    }
}
