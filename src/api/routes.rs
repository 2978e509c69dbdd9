use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        // Recommendation cycle
        .route(
            "/sessions/:id/recommendations",
            post(handlers::request_recommendations)
                .get(handlers::list_recommendations)
                .delete(handlers::clear_recommendations),
        )
        // Favorites and watch history
        .route(
            "/sessions/:id/favorites",
            post(handlers::add_favorite).get(handlers::list_favorites),
        )
        .route(
            "/sessions/:id/history",
            post(handlers::mark_watched).get(handlers::list_history),
        )
        .route("/sessions/:id/insights", get(handlers::get_insights))
        // Per-session API keys
        .route(
            "/sessions/:id/config",
            put(handlers::configure_session),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
