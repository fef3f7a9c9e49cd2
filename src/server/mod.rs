mod form;
pub mod handlers;
pub mod types;

pub use form::GenerationForm;

use crate::{
    Result,
    config::{Config, ServerConfig},
    generation::GenerationService,
    provider::GeminiClient,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let app: Router<AppState> = Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/edit", post(handlers::edit))
        .route("/api/virtual_try_on", post(handlers::virtual_try_on))
        .route("/api/restore_old_image", post(handlers::restore_old_image))
        .route("/api/health", get(handlers::health));

    let app = match &config.static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.route("/", get(handlers::index)),
    };

    app.layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let provider = GeminiClient::new(&config.provider)?;
    let service = GenerationService::new(
        Arc::new(provider),
        Duration::from_secs(config.provider.timeout_secs),
    );

    let app_state = AppState {
        service: Arc::new(service),
    };

    let app = router(app_state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (model {}, timeout {}s)",
        addr, config.provider.model, config.provider.timeout_secs
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
