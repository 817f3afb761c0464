//! Inline button payloads
//!
//! Payloads are `;`-joined fields: the first is the action tag, the last is
//! the track id. The id is percent-encoded on the way out so an id that
//! contains `;` can never be mistaken for a field boundary.

use crate::error::CallbackDataError;
use std::fmt;

/// Field separator inside callback payloads
pub const SEPARATOR: char = ';';

/// Action carried by an inline button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Add a track to the presser's Spotify queue
    Queue,
}

impl CallbackAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
        }
    }

    fn parse(tag: &str) -> Result<Self, CallbackDataError> {
        match tag {
            "queue" => Ok(Self::Queue),
            other => Err(CallbackDataError::UnknownAction(other.to_string())),
        }
    }
}

/// Decoded inline button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackData {
    pub action: CallbackAction,
    pub track_id: String,
}

impl CallbackData {
    /// Payload for the "Add to queue" button
    pub fn queue(track_id: impl Into<String>) -> Self {
        Self {
            action: CallbackAction::Queue,
            track_id: track_id.into(),
        }
    }

    /// Parse a raw payload; the track id is the last field
    pub fn parse(data: &str) -> Result<Self, CallbackDataError> {
        if data.is_empty() {
            return Err(CallbackDataError::Empty);
        }

        let Some((head, encoded_id)) = data.rsplit_once(SEPARATOR) else {
            return Err(CallbackDataError::MissingAction(data.to_string()));
        };

        let tag = head.split(SEPARATOR).next().unwrap_or(head);
        let action = CallbackAction::parse(tag)?;

        let track_id = urlencoding::decode(encoded_id)
            .map_err(|_| CallbackDataError::InvalidTrackId(encoded_id.to_string()))?
            .into_owned();

        Ok(Self { action, track_id })
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.action.as_str(),
            SEPARATOR,
            urlencoding::encode(&self.track_id)
        )
    }
}
