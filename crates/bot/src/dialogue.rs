//! Login conversation
//!
//! Free text in a private chat gets a Yes/No prompt asking whether the user
//! wants to log in; the answer is handled by the next message.

use crate::context::BotContext;
use crate::handlers;
use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove};

pub type LoginDialogue = Dialogue<LoginState, InMemStorage<LoginState>>;

const ANSWER_PROMPT: &str = "Please answer Yes or No";
const DECLINED: &str = "Okay. Text /start whenever you want to log in with Spotify.";

/// State of the login conversation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoginState {
    #[default]
    Idle,
    AwaitingAnswer,
}

impl LoginState {
    /// Conversation step number, `None` outside the conversation
    pub const fn step(&self) -> Option<u8> {
        match self {
            Self::Idle => None,
            Self::AwaitingAnswer => Some(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAnswer {
    Yes,
    No,
}

impl LoginAnswer {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

/// Ask for a Yes/No answer and enter the first conversation step
pub async fn login_fallback(bot: &Bot, chat_id: ChatId) -> Result<LoginState> {
    let keyboard = KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("Yes"),
        KeyboardButton::new("No"),
    ]])
    .one_time_keyboard();

    bot.send_message(chat_id, ANSWER_PROMPT)
        .reply_markup(keyboard)
        .await?;

    Ok(LoginState::AwaitingAnswer)
}

/// Handle text that is neither a command nor an expected answer
pub async fn handle_fallback(bot: Bot, msg: Message, dialogue: LoginDialogue) -> Result<()> {
    let state = login_fallback(&bot, msg.chat.id).await?;
    tracing::debug!("Chat {} at login step {:?}", msg.chat.id, state.step());
    dialogue.update(state).await?;

    Ok(())
}

/// Handle the answer to the Yes/No prompt
pub async fn handle_answer(
    bot: Bot,
    msg: Message,
    dialogue: LoginDialogue,
    ctx: BotContext,
) -> Result<()> {
    match msg.text().and_then(LoginAnswer::parse) {
        Some(LoginAnswer::Yes) => {
            let user = msg
                .from
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("No user in message"))?;

            handlers::send_login_message(&bot, msg.chat.id, &ctx.oauth, user.id.0 as i64).await?;
            dialogue.exit().await?;
        }
        Some(LoginAnswer::No) => {
            bot.send_message(msg.chat.id, DECLINED)
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.exit().await?;
        }
        None => handle_fallback(bot, msg, dialogue).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_parsing() {
        assert_eq!(LoginAnswer::parse("Yes"), Some(LoginAnswer::Yes));
        assert_eq!(LoginAnswer::parse(" no "), Some(LoginAnswer::No));
        assert_eq!(LoginAnswer::parse("maybe"), None);
    }

    #[test]
    fn test_first_step_is_zero() {
        assert_eq!(LoginState::AwaitingAnswer.step(), Some(0));
        assert_eq!(LoginState::default().step(), None);
    }
}
