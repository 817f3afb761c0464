use anyhow::Result;
use bot::config::Config;
use bot::context::BotContext;
use bot::db::BotDb;
use bot::spotify::SpotifyOAuth;
use nowplaying_shared::bootstrap;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    bootstrap::init_env();

    // The guard must be kept alive for the duration of the program to ensure logs are flushed
    let _guard = bootstrap::init_tracing("bot");

    tracing::info!("Starting Now Playing Telegram bot");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let oauth = SpotifyOAuth::from_config(&config.spotify);
    if !oauth.is_oauth_ready() {
        tracing::warn!("Spotify credentials are incomplete, /start will not hand out login links");
    }

    // Create database connection pool
    let pool = bootstrap::init_db(&config.core).await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations completed");

    let ctx = BotContext::new(BotDb::new(pool, reqwest::Client::new()), oauth);

    tokio::select! {
        result = bot::run_bot(ctx, config.core.telegram_bot_token) => {
            tracing::error!("Bot service exited: {:?}", result);
            result
        }
        () = bootstrap::wait_for_shutdown() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    }
}
