//! User function host - main entry point
//!
//! Serves the user function over HTTP:
//! - Loads configuration from the environment
//! - Creates the `users` table in the SQLite database
//! - Routes every request on the function route to the function

mod config;
mod db;
mod router;

use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_function_sdk::{UserFunction, UserStore};

use crate::config::AppConfig;
use crate::db::Database;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub function: UserFunction,
    pub store: Arc<dyn UserStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,user_function_host=debug,user_function_sdk=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting user function host");

    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let db = Database::new(&config.database_path)?;
    db.migrate()?;
    tracing::info!(path = ?db.path(), "Database initialized");

    let addr = config.listen_addr();
    let state = Arc::new(AppState {
        function: UserFunction::new(config.revision),
        store: Arc::new(db),
        config,
    });

    tracing::info!(
        route = %state.config.route,
        revision = %state.function.revision(),
        "Function registered"
    );

    let app = router::create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server exited")?;

    Ok(())
}
