pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod tokens;
pub mod users;

pub use app::AppState;

use axum::routing::{get, post};
use axum::Router;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route("/admin", get(handlers::admin_area))
        .route("/super", get(handlers::super_area))
        .with_state(state)
}
