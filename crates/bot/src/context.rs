//! Per-update handler context
//!
//! Everything a handler needs besides the update itself. Injected through
//! the dispatcher's dependency map and cloned for every update.

use crate::db::UserStore;
use crate::spotify::SpotifyOAuth;
use std::sync::Arc;

#[derive(Clone)]
pub struct BotContext {
    pub store: Arc<dyn UserStore>,
    pub oauth: Arc<SpotifyOAuth>,
}

impl BotContext {
    pub fn new(store: impl UserStore + 'static, oauth: SpotifyOAuth) -> Self {
        Self {
            store: Arc::new(store),
            oauth: Arc::new(oauth),
        }
    }
}
