//! Parse and graph routes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::{info, warn};

use crate::graph::{self, AstValue, DecodeError, Graph};
use crate::parser::ParseError;
use crate::state::AppState;

type RouteError = (StatusCode, &'static str);

#[derive(Debug, Deserialize)]
pub struct ParseBody {
    pub code: String,
}

/// `POST /parse` — run the external parser and return its JSON tree as-is.
///
/// The tree is relayed byte for byte, so it is never depth-limited.
pub async fn parse(
    State(state): State<AppState>,
    body: Result<Json<ParseBody>, JsonRejection>,
) -> Result<Json<Box<RawValue>>, RouteError> {
    let Json(body) = body.map_err(reject_body)?;
    let tree = run_parser(&state, &body.code).await?;
    Ok(Json(tree))
}

/// `POST /graph` — parse source text, then build and lay out its graph.
pub async fn graph(
    State(state): State<AppState>,
    body: Result<Json<ParseBody>, JsonRejection>,
) -> Result<Json<Graph>, RouteError> {
    let Json(body) = body.map_err(reject_body)?;
    let raw = run_parser(&state, &body.code).await?;
    let tree = graph::decode_tree(raw.get().as_bytes()).map_err(|e| {
        warn!(error = %e, "parser output not renderable");
        match e {
            DecodeError::TooDeep { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Parser output nests too deeply"),
            DecodeError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Parser returned invalid JSON"),
        }
    })?;
    Ok(Json(render(&state, tree)))
}

/// `POST /graph/ast` — build and lay out a graph from a syntax tree the caller already has.
///
/// The body is decoded with [`graph::decode_tree`], so trees up to
/// [`graph::MAX_TREE_DEPTH`] levels are accepted.
pub async fn graph_from_ast(State(state): State<AppState>, body: Bytes) -> Result<Json<Graph>, RouteError> {
    let tree = graph::decode_tree(&body).map_err(|e| {
        warn!(error = %e, "invalid syntax tree body");
        match e {
            DecodeError::TooDeep { .. } => (StatusCode::BAD_REQUEST, "Syntax tree nests too deeply"),
            DecodeError::Json(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
        }
    })?;
    Ok(Json(render(&state, tree)))
}

async fn run_parser(state: &AppState, code: &str) -> Result<Box<RawValue>, RouteError> {
    state.parser.parse(code).await.map_err(|e| {
        warn!(error = %e, "parser failed");
        parse_error_to_status(&e)
    })
}

fn render(state: &AppState, tree: serde_json::Value) -> Graph {
    let graph = graph::render(&Arc::new(AstValue::from(tree)), &state.builder, &state.engine);
    info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "graph rendered");
    graph
}

fn reject_body(rejection: JsonRejection) -> RouteError {
    warn!(error = %rejection, "invalid request body");
    (StatusCode::BAD_REQUEST, "Invalid request body")
}

pub(crate) fn parse_error_to_status(err: &ParseError) -> RouteError {
    match err {
        ParseError::TempFile(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create temporary file"),
        ParseError::Spawn { .. } | ParseError::Failed { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to execute parser command")
        }
        ParseError::Timeout { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Parser timed out"),
        ParseError::InvalidOutput(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Parser returned invalid JSON"),
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
