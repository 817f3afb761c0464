//! Now Playing Bot - Telegram bot for sharing what you play on Spotify
//!
//! This crate wires the update handlers into a teloxide dispatcher.

pub mod cards;
pub mod commands;
pub mod config;
pub mod context;
pub mod db;
pub mod dialogue;
pub mod handlers;
pub mod spotify;

use anyhow::Result;
use commands::Command;
use context::BotContext;
use dialogue::{LoginDialogue, LoginState};
use std::fmt::Debug;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::Me;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), HandlerError>;

/// Run the Telegram bot service
///
/// This function initializes the bot dispatcher and runs until it exits or encounters an error.
/// It does not handle Ctrl+C signals - that should be handled by the caller.
///
/// # Arguments
/// * `ctx` - User store and Spotify OAuth settings shared by all handlers
/// * `bot_token` - Telegram bot token for authentication
pub async fn run_bot(ctx: BotContext, bot_token: String) -> Result<()> {
    let bot = Bot::new(bot_token);
    tracing::info!("Bot initialized, starting dispatcher");

    // Note: NOT using enable_ctrlc_handler() - shutdown is managed by the caller
    Dispatcher::builder(bot, build_handler_tree())
        .dependencies(dptree::deps![ctx, InMemStorage::<LoginState>::new()])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Build the update handler schema
pub fn build_handler_tree() -> UpdateHandler<HandlerError> {
    let messages = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<LoginState>, LoginState>()
        // Commands always win over the login conversation
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::case![LoginState::AwaitingAnswer].endpoint(handle_login_answer))
        .branch(
            dptree::filter(|msg: Message| msg.chat.is_private() && msg.text().is_some())
                .endpoint(handle_login_fallback),
        );

    dptree::entry()
        .branch(messages)
        .branch(Update::filter_inline_query().endpoint(handle_inline_query))
        .branch(Update::filter_callback_query().endpoint(handle_callback_query))
}

/// Log a failed update together with the update that caused it
///
/// Nothing is retried; the update is considered handled.
pub fn log_update_error(update: &impl Debug, err: &anyhow::Error) {
    tracing::error!("Update {:?} caused error: {:#}", update, err);
}

fn report(update: &impl Debug, result: Result<()>) {
    if let Err(e) = result {
        log_update_error(update, &e);
    }
}

/// Route commands to their handlers
async fn handle_command(bot: Bot, msg: Message, cmd: Command, ctx: BotContext) -> HandlerResult {
    tracing::info!("Handling command: {:?}", cmd);

    let result = match cmd {
        Command::Start(payload) => handlers::handle_start(bot, msg.clone(), ctx, payload).await,
        Command::Help => handlers::handle_help(bot, msg.clone()).await,
    };

    report(&msg, result);
    Ok(())
}

async fn handle_login_fallback(bot: Bot, msg: Message, dialogue: LoginDialogue) -> HandlerResult {
    let result = dialogue::handle_fallback(bot, msg.clone(), dialogue).await;

    report(&msg, result);
    Ok(())
}

async fn handle_login_answer(
    bot: Bot,
    msg: Message,
    dialogue: LoginDialogue,
    ctx: BotContext,
) -> HandlerResult {
    let result = dialogue::handle_answer(bot, msg.clone(), dialogue, ctx).await;

    report(&msg, result);
    Ok(())
}

async fn handle_inline_query(bot: Bot, query: InlineQuery, ctx: BotContext) -> HandlerResult {
    let result = handlers::handle_inline_query(bot, query.clone(), ctx).await;

    report(&query, result);
    Ok(())
}

async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    me: Me,
    ctx: BotContext,
) -> HandlerResult {
    let result = handlers::handle_callback_query(bot, query.clone(), me, ctx).await;

    report(&query, result);
    Ok(())
}
