//! Database operations for the bot
//!
//! User lookups needed by the handlers. Rows are written by the OAuth
//! callback service once a user finishes logging in.

use crate::spotify::{SpotifyClient, WebSpotifyClient};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::fmt;
use std::sync::Arc;

/// A Telegram user as the bot sees them
#[derive(Clone)]
pub struct User {
    pub telegram_id: i64,

    /// `None` until the user has linked a Spotify account
    pub spotify: Option<Arc<dyn SpotifyClient>>,
}

impl User {
    pub const fn is_linked(&self) -> bool {
        self.spotify.is_some()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("telegram_id", &self.telegram_id)
            .field("linked", &self.is_linked())
            .finish()
    }
}

/// Lookup of users by Telegram id
///
/// Implementations scope each call to its own unit of work; nothing is held
/// open between calls.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, telegram_id: i64) -> Result<Option<User>>;
}

/// Row shape of the `users` table
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    telegram_id: i64,
    spotify_access_token: Option<String>,
}

/// Bot database handle
#[derive(Clone)]
pub struct BotDb {
    pool: PgPool,
    http: reqwest::Client,
}

impl BotDb {
    /// Create a new database handle
    ///
    /// `http` is shared by every Spotify client built from a user row.
    pub fn new(pool: PgPool, http: reqwest::Client) -> Self {
        Self { pool, http }
    }

    fn user_from_row(&self, row: UserRow) -> User {
        let spotify = row.spotify_access_token.map(|token| {
            Arc::new(WebSpotifyClient::new(self.http.clone(), token)) as Arc<dyn SpotifyClient>
        });

        User {
            telegram_id: row.telegram_id,
            spotify,
        }
    }
}

#[async_trait]
impl UserStore for BotDb {
    async fn get_user(&self, telegram_id: i64) -> Result<Option<User>> {
        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT telegram_id, spotify_access_token
            FROM users
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.map(|row| self.user_from_row(row)))
    }
}
