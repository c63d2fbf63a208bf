use crate::handlers;
use crate::session::session_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let sessions = session_layer(state.config.session_idle);

    Router::new()
        .route("/", get(handlers::index))
        .route("/members", post(handlers::register_form))
        .route("/goal", post(handlers::set_goal_form))
        .route("/shop/{action}", post(handlers::shop_form))
        .route("/export.csv", get(handlers::export_csv))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/members", post(handlers::register))
        .route("/api/shop", post(handlers::shop))
        .route("/api/goal", put(handlers::set_goal))
        .route("/healthz", get(handlers::health))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
