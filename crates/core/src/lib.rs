//! Now Playing Core - Domain logic and models
//!
//! This crate contains pure domain logic with no I/O operations.
//! Playback models, the callback payload format, error types and
//! configuration loading are defined here.

pub mod callback;
pub mod config;
pub mod error;
pub mod models;
pub mod queue;

pub use callback::CallbackData;
pub use error::{CallbackDataError, ConfigError, SpotifyError};
pub use models::{ContextKind, PlaybackContext, PlaybackStatus, Song, Thumbnail};
pub use queue::QueueFailure;
