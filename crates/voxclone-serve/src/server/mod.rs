pub mod api;
pub mod state;

use crate::config::ServerConfig;
use crate::error::{Result, ServeError};
use api::create_router;
use state::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use voxclone_speech::SynthesisService;

/// Start the HTTP server for an initialized synthesis service
///
/// # Example
///
/// ```no_run
/// use voxclone_serve::{build_service, create_loader, serve, ServiceConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServiceConfig::default();
///     let service = build_service(&config, create_loader(&config)?).await?;
///     service.engine().initialize().await?;
///
///     serve(config.server, service).await?;
///     Ok(())
/// }
/// ```
pub async fn serve(config: ServerConfig, service: SynthesisService) -> Result<()> {
    log::info!("Initializing voxclone HTTP server");
    log::debug!("Server configuration: {:?}", config);

    // Uploads from a previous run; no request is in flight yet
    service.transient_store().purge().await;

    if !service.engine().is_ready() {
        log::warn!("Serving before the synthesis model is loaded; requests will fail");
    }

    let state = Arc::new(AppState::new(service, &config));
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        log::error!("Failed to bind to {}: {}", addr, e);
        ServeError::IoError(e)
    })?;

    log::info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("Server error: {}", e);
        return Err(ServeError::ServerError(e.to_string()));
    }

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => log::info!("Received SIGTERM, shutting down..."),
    }
}
