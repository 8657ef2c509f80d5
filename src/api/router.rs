use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_session;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes, no session required
    let public = Router::new()
        .route("/health", get(handlers::system::health_check))
        .route("/metrics", get(handlers::system::render_metrics));

    let protected = Router::new()
        // Settlement
        .route("/api/settle/preview", post(handlers::settle::preview))
        // Bets
        .route("/api/users/:user_id/bets", get(handlers::bets::list).post(handlers::bets::create))
        .route(
            "/api/bets/:id",
            get(handlers::bets::detail)
                .put(handlers::bets::update)
                .delete(handlers::bets::remove),
        )
        // Analytics
        .route("/api/users/:user_id/stats", get(handlers::analytics::stats))
        .route("/api/users/:user_id/monthly", get(handlers::analytics::monthly))
        .route("/api/users/:user_id/bankroll", get(handlers::analytics::bankroll))
        .route("/api/users/:user_id/breakdown", get(handlers::analytics::breakdown))
        // Tipsters
        .route("/api/tipsters/ranking", get(handlers::tipsters::ranking))
        .route("/api/tipsters/:user_id/stats", get(handlers::tipsters::stats))
        // Exports
        .route("/api/users/:user_id/export/rows", get(handlers::exports::rows))
        .route("/api/users/:user_id/export/csv", get(handlers::exports::csv))
        .route("/api/users/:user_id/export/report", get(handlers::exports::report))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
