use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::booking::BookingPipeline;
use crate::components::{GoogleCalendarClient, ZoomClient};
use crate::config::Config;
use crate::error::Error;
use crate::handlers::{book_meeting_handler, health_handler, AppState};
use crate::shutdown;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the webhook router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/book", post(book_meeting_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wire up the clients and serve until a shutdown signal arrives
pub async fn start_server(config: Config) -> miette::Result<()> {
    // The Zoom client is both the token source and the booking service
    let zoom = Arc::new(ZoomClient::new(&config));
    let calendar = Arc::new(GoogleCalendarClient::new(&config));

    let pipeline = BookingPipeline::new(config.timezone, zoom.clone(), zoom, calendar);
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = app(state);

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send).await;
    });

    // Bind to address and run server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_recv.await;
        })
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
