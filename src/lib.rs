pub mod api;
pub mod config;
pub mod db;
pub mod ui;

pub use db::DbPool;

use axum::Router;
use config::Config;
use std::sync::Arc;

/// Shared, read-only state handed to every handler
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self { config, db }
    }
}

/// Full application: JSON API plus the server-rendered pages
pub fn router(state: Arc<AppState>) -> Router {
    api::create_router(state.clone()).merge(ui::create_router().with_state(state))
}
