//! Update handlers
//!
//! Implementation of the command, inline query and button handlers. The
//! decisions live in plain async functions (`get_login_message`,
//! `now_playing`, `queue_track`) so they can be exercised without Telegram;
//! the `handle_*` functions only turn their results into Bot API calls.

use crate::cards;
use crate::context::BotContext;
use crate::spotify::SpotifyOAuth;
use anyhow::Result;
use nowplaying_core::{CallbackData, QueueFailure, SpotifyError};
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultsButton,
    InlineQueryResultsButtonKind, Me,
};

pub const BOT_DESCRIPTION: &str = "I show what you're listening to on Spotify.\n\n\
     Type my username in any chat to share the song you're playing right now, \
     and the album or playlist it's from. Anyone in the chat can add it to \
     their own queue with one tap.\n\n\
     /start - Log in with your Spotify account\n\
     /help - Show this message";

const LOGIN_PROMPT: &str = "Tap the button below to log in with your Spotify account";
const LOGIN_UNAVAILABLE: &str = "There's something wrong";
const LOGIN_BUTTON: &str = "Login";
const INLINE_LOGIN_BUTTON: &str = "Login with Spotify";
const ADDED_TO_QUEUE: &str = "Added to your queue";

/// Deep-link payload of the inline "Login with Spotify" button
pub const LOGIN_START_PARAMETER: &str = "spotify_log_in";

/// Reply to a login request
#[derive(Debug, Clone, PartialEq)]
pub struct LoginMessage {
    pub text: &'static str,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

/// Build the login reply for a Telegram user
///
/// The user id travels as OAuth `state`, so the callback service knows
/// which row to attach the tokens to.
pub fn get_login_message(oauth: &SpotifyOAuth, telegram_id: i64) -> LoginMessage {
    let unavailable = LoginMessage {
        text: LOGIN_UNAVAILABLE,
        keyboard: None,
    };

    if !oauth.is_oauth_ready() {
        tracing::warn!("Spotify OAuth is not configured, cannot log in user {}", telegram_id);
        return unavailable;
    }

    let Some(url) = oauth.auth_uri(&telegram_id.to_string()) else {
        return unavailable;
    };

    LoginMessage {
        text: LOGIN_PROMPT,
        keyboard: Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::url(LOGIN_BUTTON, url),
        ]])),
    }
}

/// Send the login reply to a chat
pub async fn send_login_message(
    bot: &Bot,
    chat_id: ChatId,
    oauth: &SpotifyOAuth,
    telegram_id: i64,
) -> Result<()> {
    let login = get_login_message(oauth, telegram_id);

    let mut request = bot.send_message(chat_id, login.text);
    if let Some(keyboard) = login.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;

    Ok(())
}

/// Handle the /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, BOT_DESCRIPTION).await?;

    Ok(())
}

/// Handle the /start command
pub async fn handle_start(bot: Bot, msg: Message, ctx: BotContext, payload: String) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No user in message"))?;
    let telegram_id = user.id.0 as i64;

    if !payload.is_empty() {
        tracing::debug!("User {} started the bot with payload {}", telegram_id, payload);
    }

    send_login_message(&bot, msg.chat.id, &ctx.oauth, telegram_id).await?;

    tracing::info!("User {} requested a login link", telegram_id);

    Ok(())
}

/// Outcome of an inline query
#[derive(Debug)]
pub enum InlineAnswer {
    /// No linked account; steer the user to the login flow
    Login,
    /// Linked, but the player is idle
    NothingPlaying,
    Cards(Vec<InlineQueryResult>),
}

impl InlineAnswer {
    pub fn results(&self) -> &[InlineQueryResult] {
        match self {
            Self::Cards(cards) => cards,
            Self::Login | Self::NothingPlaying => &[],
        }
    }
}

/// Inline query answer ready to be sent
#[derive(Debug)]
pub struct InlineReply {
    pub results: Vec<InlineQueryResult>,
    pub cache_time: u32,
    pub button: Option<InlineQueryResultsButton>,
}

impl From<InlineAnswer> for InlineReply {
    /// Every reply has `cache_time` 0
    fn from(answer: InlineAnswer) -> Self {
        match answer {
            InlineAnswer::Login => Self {
                results: Vec::new(),
                cache_time: 0,
                button: Some(InlineQueryResultsButton {
                    text: INLINE_LOGIN_BUTTON.to_string(),
                    kind: InlineQueryResultsButtonKind::StartParameter(
                        LOGIN_START_PARAMETER.to_string(),
                    ),
                }),
            },
            InlineAnswer::NothingPlaying => Self {
                results: Vec::new(),
                cache_time: 0,
                button: None,
            },
            InlineAnswer::Cards(cards) => Self {
                results: cards,
                cache_time: 0,
                button: None,
            },
        }
    }
}

/// Look up what a user is playing and build the inline cards for it
pub async fn now_playing(ctx: &BotContext, telegram_id: i64) -> Result<InlineAnswer> {
    let Some(spotify) = ctx
        .store
        .get_user(telegram_id)
        .await?
        .and_then(|user| user.spotify)
    else {
        return Ok(InlineAnswer::Login);
    };

    let status = match spotify.status().await {
        Ok(status) => status,
        Err(SpotifyError::Auth) => {
            tracing::warn!("Spotify authorization expired for user {}", telegram_id);
            return Ok(InlineAnswer::Login);
        }
        Err(e) => return Err(e.into()),
    };

    let Some(song) = &status.song else {
        tracing::warn!("No song found for user {}", telegram_id);
        return Ok(InlineAnswer::NothingPlaying);
    };

    tracing::info!("{} - {}", song.artist, song.name);

    Ok(InlineAnswer::Cards(cards::now_playing_cards(
        song,
        status.context.as_ref(),
    )?))
}

/// Handle an inline query
pub async fn handle_inline_query(bot: Bot, query: InlineQuery, ctx: BotContext) -> Result<()> {
    let telegram_id = query.from.id.0 as i64;

    let reply = InlineReply::from(now_playing(&ctx, telegram_id).await?);

    let mut request = bot
        .answer_inline_query(query.id, reply.results)
        .cache_time(reply.cache_time);
    if let Some(button) = reply.button {
        request = request.button(button);
    }
    request.await?;

    Ok(())
}

/// Answer to a button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackReply {
    pub text: String,
    /// Blocking alert instead of a toast
    pub show_alert: bool,
}

impl CallbackReply {
    fn toast(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            show_alert: false,
        }
    }

    fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            show_alert: true,
        }
    }
}

/// Add the track behind an "Add to queue" button to the presser's queue
///
/// `bot_name` is the bot's `@username`, used to tell unlinked users where
/// to send /start.
pub async fn queue_track(
    ctx: &BotContext,
    telegram_id: i64,
    data: Option<&str>,
    bot_name: &str,
) -> Result<CallbackReply> {
    let data = match data.map(CallbackData::parse) {
        Some(Ok(data)) => data,
        Some(Err(e)) => {
            tracing::warn!("Ignoring button press from user {}: {}", telegram_id, e);
            return Ok(CallbackReply::toast(QueueFailure::Other.user_message()));
        }
        None => {
            tracing::warn!("Button press without data from user {}", telegram_id);
            return Ok(CallbackReply::toast(QueueFailure::Other.user_message()));
        }
    };

    let Some(spotify) = ctx
        .store
        .get_user(telegram_id)
        .await?
        .and_then(|user| user.spotify)
    else {
        return Ok(CallbackReply::toast(format!(
            "Please log in by texting /start to {bot_name}"
        )));
    };

    match spotify.add_to_queue(&data.track_id).await {
        Ok(()) => {
            tracing::info!("Add to queue {} for user {}", data.track_id, telegram_id);
            Ok(CallbackReply::toast(ADDED_TO_QUEUE))
        }
        Err(e) => {
            tracing::error!(
                "Add to queue error {} for user {}: {}",
                data.track_id,
                telegram_id,
                e
            );

            let failure = QueueFailure::from(&e);
            let reply = if failure.is_blocking() {
                CallbackReply::alert(format!(
                    "{}\nTo do so, text /start to {}",
                    failure.user_message(),
                    bot_name
                ))
            } else {
                CallbackReply::toast(failure.user_message())
            };
            Ok(reply)
        }
    }
}

/// Handle an inline button press
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    me: Me,
    ctx: BotContext,
) -> Result<()> {
    let telegram_id = query.from.id.0 as i64;
    let bot_name = format!("@{}", me.username());

    let reply = queue_track(&ctx, telegram_id, query.data.as_deref(), &bot_name).await?;

    bot.answer_callback_query(query.id)
        .text(reply.text)
        .show_alert(reply.show_alert)
        .await?;

    Ok(())
}
