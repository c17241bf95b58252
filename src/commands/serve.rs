//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{select_backend, Database};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Establish both candidate connections
    let db = Arc::new(Database::connect(&config).await);

    // Pick the repository backend once for the process lifetime;
    // without any working connection this is fatal
    let selection = select_backend(db.orm(), db.pool())?;
    match &selection.degraded {
        Some(reason) => tracing::warn!(
            backend = %selection.backend,
            %reason,
            cause = db.orm_failure().unwrap_or("unknown"),
            "Category repository running degraded"
        ),
        None => tracing::info!(backend = %selection.backend, "Category repository ready"),
    }

    // Create application state with the selected backend wired in
    let app_state = AppState::from_selection(db, &selection);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
