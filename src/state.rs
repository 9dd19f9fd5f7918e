//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parser seam plus the configured builder and layout engine. No
//! graph data lives here: every request builds and lays out its own graph.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::graph::{GraphBuilder, TreeLayoutEngine};
use crate::parser::{CommandParser, SyntaxParser};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the parser is Arc-wrapped, the rest is Copy.
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<dyn SyntaxParser>,
    pub builder: GraphBuilder,
    pub engine: TreeLayoutEngine,
}

impl AppState {
    #[must_use]
    pub fn new(parser: Arc<dyn SyntaxParser>, builder: GraphBuilder, engine: TreeLayoutEngine) -> Self {
        Self { parser, builder, engine }
    }

    /// State backed by the external parser command named in `config`.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(CommandParser::new(config.parser.clone())),
            GraphBuilder::new(config.build),
            TreeLayoutEngine::new(config.layout),
        )
    }
}
