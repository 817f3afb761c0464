//! Inline query result cards
//!
//! Builds the "now playing" cards shown when the bot is mentioned inline.
//! Everything user-controlled that lands in a MarkdownV2 message goes
//! through `markdown::escape` (or `escape_link_url` inside link targets).

use anyhow::Result;
use nowplaying_core::{CallbackData, ContextKind, PlaybackContext, Song, Thumbnail};
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InputMessageContent, InputMessageContentText, ParseMode,
};
use teloxide::utils::markdown;
use url::Url;
use uuid::Uuid;

const OPEN_BUTTON: &str = "Open on Spotify";
const QUEUE_BUTTON: &str = "Add to queue";

/// Card title for the current track
pub fn song_title(song: &Song) -> String {
    format!("{} - {}", song.artist, song.name)
}

/// Message sent when the track card is picked
pub fn song_message(song: &Song) -> String {
    format!(
        "🎵 [{}]({}) by {}",
        markdown::escape(&song.name),
        markdown::escape_link_url(&song.url),
        markdown::escape(&song.artist)
    )
}

/// Card title for the enclosing collection; only albums show an artist
pub fn context_title(context: &PlaybackContext) -> String {
    match (&context.kind, &context.artist) {
        (ContextKind::Album, Some(artist)) => format!("{} - {}", artist, context.name),
        _ => context.name.clone(),
    }
}

/// Message sent when the collection card is picked
pub fn context_message(context: &PlaybackContext) -> String {
    let link = format!(
        "🎧 [{}]({})",
        markdown::escape(&context.name),
        markdown::escape_link_url(&context.url)
    );

    match (&context.kind, &context.artist) {
        (ContextKind::Album, Some(artist)) => {
            format!("{} by {}", link, markdown::escape(artist))
        }
        _ => link,
    }
}

fn markdown_content(text: String) -> InputMessageContent {
    InputMessageContent::Text(InputMessageContentText::new(text).parse_mode(ParseMode::MarkdownV2))
}

fn with_thumbnail(
    article: InlineQueryResultArticle,
    thumbnail: Option<&Thumbnail>,
) -> InlineQueryResultArticle {
    let Some(thumbnail) = thumbnail else {
        return article;
    };

    let Ok(url) = Url::parse(&thumbnail.url) else {
        tracing::warn!("Skipping unparseable thumbnail url {}", thumbnail.url);
        return article;
    };

    let mut article = article.thumbnail_url(url);
    if let Some(width) = thumbnail.width {
        article = article.thumbnail_width(width);
    }
    if let Some(height) = thumbnail.height {
        article = article.thumbnail_height(height);
    }
    article
}

/// Card for the track itself, with open and queue buttons
pub fn song_card(song: &Song) -> Result<InlineQueryResult> {
    let url = Url::parse(&song.url)?;

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url(OPEN_BUTTON, url.clone()),
        InlineKeyboardButton::callback(QUEUE_BUTTON, CallbackData::queue(&song.id).to_string()),
    ]]);

    let article = InlineQueryResultArticle::new(
        Uuid::new_v4().to_string(),
        song_title(song),
        markdown_content(song_message(song)),
    )
    .url(url)
    .reply_markup(keyboard);

    Ok(InlineQueryResult::Article(with_thumbnail(
        article,
        song.thumbnail.as_ref(),
    )))
}

/// Card for the album/playlist the track is played from
pub fn context_card(context: &PlaybackContext) -> Result<InlineQueryResult> {
    let url = Url::parse(&context.url)?;

    let keyboard =
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(OPEN_BUTTON, url.clone())]]);

    let article = InlineQueryResultArticle::new(
        Uuid::new_v4().to_string(),
        context_title(context),
        markdown_content(context_message(context)),
    )
    .url(url)
    .description(context.kind.as_str())
    .reply_markup(keyboard);

    Ok(InlineQueryResult::Article(with_thumbnail(
        article,
        context.thumbnail.as_ref(),
    )))
}

/// One card for the track, plus one for its context when there is one
pub fn now_playing_cards(
    song: &Song,
    context: Option<&PlaybackContext>,
) -> Result<Vec<InlineQueryResult>> {
    let mut cards = vec![song_card(song)?];

    if let Some(context) = context {
        cards.push(context_card(context)?);
    }

    Ok(cards)
}
