//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A browser front end posts source text and draws the returned graph, so
//! every route answers CORS preflights permissively. Parsing is delegated to
//! the external parser; graph building and layout run in-process.

pub mod graph;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full HTTP router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/parse", post(graph::parse))
        .route("/graph", post(graph::graph))
        .route("/graph/ast", post(graph::graph_from_ast))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
