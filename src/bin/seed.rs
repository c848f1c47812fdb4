//! Ensures the default administrator account exists.
//!
//! Takes no flags. Uses the database from `campus.toml` unless
//! `DATABASE_URL` overrides it, reports what it did on stdout and always
//! exits successfully.

use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus::config::Config;
use campus::db;

const CONFIG_PATH: &str = "campus.toml";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Same precedence as the server: config file, then DATABASE_URL
    let mut config = match Config::load(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Seeding failed: {:#}", e);
            println!("Error seeding database: {:#}", e);
            return;
        }
    };
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }

    let pool = match db::connect(&config.database.url, 1).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Seeding failed: {:#}", e);
            println!("Error seeding database: {:#}", e);
            return;
        }
    };

    for line in db::seed_and_report(&pool).await {
        println!("{}", line);
    }

    pool.close().await;
}
