use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::modules::config::Settings;
use crate::proxy::common::client_builder::{build_api_client, build_passthrough_client};
use crate::proxy::handlers;
use crate::proxy::upstream::{MediaPathResolver, Passthrough};

/// Shared, read-only state for every request.
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub resolver: MediaPathResolver,
    pub passthrough: Passthrough,
}

impl AppState {
    pub fn new(settings: Settings) -> AppResult<Self> {
        let api_client = build_api_client(settings.emby.timeout).map_err(AppError::HttpClient)?;
        let passthrough_client = build_passthrough_client().map_err(AppError::HttpClient)?;
        Self::with_clients(settings, api_client, passthrough_client)
    }

    /// Build state around caller-supplied HTTP clients.
    pub fn with_clients(
        settings: Settings,
        api_client: reqwest::Client,
        passthrough_client: reqwest::Client,
    ) -> AppResult<Self> {
        let resolver =
            MediaPathResolver::new(api_client, &settings.emby.host, settings.emby.timeout);
        let passthrough = Passthrough::new(passthrough_client, &settings.emby.host)?;
        Ok(Self { settings: Arc::new(settings), resolver, passthrough })
    }
}

/// Single catch-all route: all methods and paths go through the dispatcher.
pub fn build_proxy_router(state: AppState) -> Router<()> {
    Router::new()
        .fallback(handlers::handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
