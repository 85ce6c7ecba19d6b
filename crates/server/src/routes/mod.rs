use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use tower_http::trace::TraceLayer;
use utils::response::ApiResponse;

use crate::AppState;

pub mod analyze;
pub mod health;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health::router())
        .merge(analyze::router());

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("Not found")),
    )
}
