//! Jukebox Server Library
//!
//! Collaborative playlist server: ordered queues with voting and a
//! server-driven player, over an authenticated JSON API.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{AuthService, EventBus, QueueService};
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use jukebox_core::QueueStore;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Wire the services for `store` according to `config`
pub fn build_state(store: Arc<dyn QueueStore>, config: &ServerConfig) -> AppState {
    let events = Arc::new(EventBus::new(config.events.channel_capacity));
    let queue = Arc::new(QueueService::new(
        store,
        Arc::clone(&events) as Arc<dyn jukebox_core::EventPublisher>,
        config.vote_policy(),
    ));
    let auth_service = Arc::new(AuthService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_hours,
    ));

    AppState::new(queue, auth_service, events)
}

/// Build the HTTP router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(api::health::health));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Playlists
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id/invites", post(api::playlists::invite_user))
        // Tracks
        .route(
            "/playlists/:id/tracks",
            get(api::tracks::list_tracks).post(api::tracks::add_track),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            patch(api::tracks::move_track).delete(api::tracks::delete_track),
        )
        .route(
            "/playlists/:id/tracks/:track_id/vote",
            post(api::tracks::vote),
        )
        // Player
        .route("/playlists/:id/player", get(api::playback::get_player))
        .route("/playlists/:id/next", post(api::playback::next_track))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
