//! Integration tests for bot dispatcher using teloxide_tests

use anyhow::Result;
use async_trait::async_trait;
use bot::build_handler_tree;
use bot::context::BotContext;
use bot::db::{User, UserStore};
use bot::dialogue::LoginState;
use bot::spotify::{SpotifyClient, SpotifyOAuth};
use nowplaying_core::{PlaybackStatus, SpotifyError};
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dptree::deps;
use teloxide_tests::{MockBot, MockCallbackQuery, MockMessageText};
use url::Url;

/// Store without any users
struct EmptyStore;

#[async_trait]
impl UserStore for EmptyStore {
    async fn get_user(&self, _telegram_id: i64) -> Result<Option<User>> {
        Ok(None)
    }
}

/// Spotify session whose token has been revoked
struct RevokedSpotify;

#[async_trait]
impl SpotifyClient for RevokedSpotify {
    async fn status(&self) -> Result<PlaybackStatus, SpotifyError> {
        Err(SpotifyError::Auth)
    }

    async fn add_to_queue(&self, _track_id: &str) -> Result<(), SpotifyError> {
        Err(SpotifyError::Auth)
    }
}

/// Store where every user is linked to a revoked Spotify session
struct RevokedStore;

#[async_trait]
impl UserStore for RevokedStore {
    async fn get_user(&self, telegram_id: i64) -> Result<Option<User>> {
        Ok(Some(User {
            telegram_id,
            spotify: Some(Arc::new(RevokedSpotify)),
        }))
    }
}

fn context(oauth: SpotifyOAuth) -> BotContext {
    BotContext::new(EmptyStore, oauth)
}

fn configured_oauth() -> SpotifyOAuth {
    SpotifyOAuth::new(
        Some("client-id".to_string()),
        Some("client-secret".to_string()),
        Url::parse("https://example.com/spotify/callback").ok(),
    )
}

/// Text of the last message the bot sent
macro_rules! last_text {
    ($bot:expr) => {{
        let responses = $bot.get_responses();
        responses
            .sent_messages_text
            .last()
            .expect("No sent messages detected")
            .message
            .text()
            .unwrap()
            .to_string()
    }};
}

/// Test that /help command gets routed correctly
#[tokio::test]
async fn test_dispatcher_help_command() {
    let mock_message = MockMessageText::new().text("/help");
    let mut bot = MockBot::new(mock_message, build_handler_tree());
    bot.dependencies(deps![
        context(SpotifyOAuth::default()),
        InMemStorage::<LoginState>::new()
    ]);

    bot.dispatch().await;

    assert!(last_text!(bot).contains("I show what you're listening to on Spotify"));
}

/// Test /start without Spotify credentials
#[tokio::test]
async fn test_dispatcher_start_without_credentials() {
    let mock_message = MockMessageText::new().text("/start");
    let mut bot = MockBot::new(mock_message, build_handler_tree());
    bot.dependencies(deps![
        context(SpotifyOAuth::default()),
        InMemStorage::<LoginState>::new()
    ]);

    bot.dispatch().await;

    assert_eq!(last_text!(bot), "There's something wrong");
}

/// Test /start with the deep-link payload from the inline login button
#[tokio::test]
async fn test_dispatcher_start_sends_login_link() {
    let mock_message = MockMessageText::new().text("/start spotify_log_in");
    let mut bot = MockBot::new(mock_message, build_handler_tree());
    bot.dependencies(deps![
        context(configured_oauth()),
        InMemStorage::<LoginState>::new()
    ]);

    bot.dispatch().await;

    let responses = bot.get_responses();
    let message = &responses
        .sent_messages_text
        .last()
        .expect("No sent messages detected")
        .message;

    assert_eq!(
        message.text(),
        Some("Tap the button below to log in with your Spotify account")
    );
    assert!(message.reply_markup().is_some(), "Expected a login button");
}

/// Free text starts the Yes/No login conversation
#[tokio::test]
async fn test_dispatcher_text_message_prompts_yes_no() {
    let mock_message = MockMessageText::new().text("hello there");
    let mut bot = MockBot::new(mock_message, build_handler_tree());
    bot.dependencies(deps![
        context(SpotifyOAuth::default()),
        InMemStorage::<LoginState>::new()
    ]);

    bot.dispatch().await;

    assert_eq!(last_text!(bot), "Please answer Yes or No");
}

/// Answering "No" leaves the conversation
#[tokio::test]
async fn test_dispatcher_login_conversation_declined() {
    let mut bot = MockBot::new(MockMessageText::new().text("hello"), build_handler_tree());
    bot.dependencies(deps![
        context(configured_oauth()),
        InMemStorage::<LoginState>::new()
    ]);
    bot.dispatch().await;

    bot.update(MockMessageText::new().text("No"));
    bot.dispatch().await;

    assert!(last_text!(bot).starts_with("Okay."));
}

/// Answering "Yes" sends the login link
#[tokio::test]
async fn test_dispatcher_login_conversation_accepted() {
    let mut bot = MockBot::new(MockMessageText::new().text("hello"), build_handler_tree());
    bot.dependencies(deps![
        context(configured_oauth()),
        InMemStorage::<LoginState>::new()
    ]);
    bot.dispatch().await;

    bot.update(MockMessageText::new().text("Yes"));
    bot.dispatch().await;

    assert_eq!(
        last_text!(bot),
        "Tap the button below to log in with your Spotify account"
    );
}

/// Pressing "Add to queue" without a linked account names the bot to /start
#[tokio::test]
async fn test_dispatcher_queue_button_for_unknown_user() {
    let callback = MockCallbackQuery::new().data("queue;4uLU6hMCjMI75M1A2tKUQC");
    let mut bot = MockBot::new(callback, build_handler_tree());
    bot.dependencies(deps![
        context(SpotifyOAuth::default()),
        InMemStorage::<LoginState>::new()
    ]);

    bot.dispatch().await;

    let responses = bot.get_responses();
    let answer = responses
        .answered_callback_queries
        .last()
        .expect("Callback query was not answered");

    assert_eq!(
        answer.text.as_deref(),
        Some("Please log in by texting /start to @test_bot")
    );
    assert_ne!(answer.show_alert, Some(true));
}

/// A revoked token blocks the user with an alert
#[tokio::test]
async fn test_dispatcher_queue_button_with_revoked_token() {
    let callback = MockCallbackQuery::new().data("queue;4uLU6hMCjMI75M1A2tKUQC");
    let mut bot = MockBot::new(callback, build_handler_tree());
    bot.dependencies(deps![
        BotContext::new(RevokedStore, SpotifyOAuth::default()),
        InMemStorage::<LoginState>::new()
    ]);

    bot.dispatch().await;

    let responses = bot.get_responses();
    let answer = responses
        .answered_callback_queries
        .last()
        .expect("Callback query was not answered");

    assert_eq!(
        answer.text.as_deref(),
        Some("Authorization needed, please login again.\nTo do so, text /start to @test_bot")
    );
    assert_eq!(answer.show_alert, Some(true));
}
