use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use talent_board::leaderboard::{page, BoardView, CandidateDirectory};

#[derive(Clone)]
pub(crate) struct BoardState {
    pub(crate) directory: Arc<CandidateDirectory>,
    pub(crate) revalidate_secs: u64,
}

/// The single page query parameter: `?cargo=<role>` selects the role filter.
#[derive(Debug, Deserialize)]
pub(crate) struct BoardQuery {
    pub(crate) cargo: Option<String>,
}

pub(crate) fn with_board_routes(state: BoardState) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(board_page))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .with_state(state)
}

pub(crate) async fn board_page(
    State(state): State<BoardState>,
    Query(query): Query<BoardQuery>,
) -> Html<String> {
    let snapshot = state.directory.snapshot().await;
    let view = BoardView::build(&snapshot.candidates, query.cargo.as_deref());
    Html(page::render_board_page(
        &view,
        &snapshot,
        state.revalidate_secs,
    ))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
