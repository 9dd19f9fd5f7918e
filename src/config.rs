//! Server configuration parsed from environment variables.

use std::time::Duration;

use crate::graph::layout::{
    DEFAULT_HORIZONTAL_GAP, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, DEFAULT_VERTICAL_GAP, LayoutConfig, is_valid_length,
};
use crate::graph::{BuildOptions, UntypedMappingPolicy};
use crate::parser::{
    DEFAULT_PARSER_ARGS, DEFAULT_PARSER_COMMAND, DEFAULT_PARSER_FILE_SUFFIX, DEFAULT_PARSER_TIMEOUT_SECS, ParserConfig,
};

pub const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported GRAPH_UNTYPED_MAPPINGS '{0}' (expected 'emit' or 'skip')")]
    UntypedMappingPolicy(String),
    #[error("PARSER_COMMAND must not be empty")]
    EmptyParserCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub parser: ParserConfig,
    pub layout: LayoutConfig,
    pub build: BuildOptions,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 4000
    /// - `PARSER_COMMAND`: default `stree`
    /// - `PARSER_ARGS`: whitespace-separated, default `json`
    /// - `PARSER_FILE_SUFFIX`: default `.rb`
    /// - `PARSER_TIMEOUT_SECS`: default 10
    /// - `LAYOUT_NODE_WIDTH`, `LAYOUT_NODE_HEIGHT`: default 120 x 40
    /// - `LAYOUT_HORIZONTAL_GAP`, `LAYOUT_VERTICAL_GAP`: default 50 / 80
    /// - `GRAPH_UNTYPED_MAPPINGS`: `emit` (default) or `skip`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown `GRAPH_UNTYPED_MAPPINGS` value or
    /// an empty `PARSER_COMMAND`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let command = std::env::var("PARSER_COMMAND").unwrap_or_else(|_| DEFAULT_PARSER_COMMAND.to_owned());
        if command.trim().is_empty() {
            return Err(ConfigError::EmptyParserCommand);
        }
        let args = match std::env::var("PARSER_ARGS") {
            Ok(raw) => raw.split_whitespace().map(str::to_owned).collect(),
            Err(_) => DEFAULT_PARSER_ARGS.iter().map(|s| (*s).to_owned()).collect(),
        };
        let parser = ParserConfig {
            command,
            args,
            file_suffix: std::env::var("PARSER_FILE_SUFFIX").unwrap_or_else(|_| DEFAULT_PARSER_FILE_SUFFIX.to_owned()),
            timeout: Duration::from_secs(env_parse("PARSER_TIMEOUT_SECS", DEFAULT_PARSER_TIMEOUT_SECS)),
        };

        let layout = LayoutConfig {
            node_width: env_positive("LAYOUT_NODE_WIDTH", DEFAULT_NODE_WIDTH),
            node_height: env_positive("LAYOUT_NODE_HEIGHT", DEFAULT_NODE_HEIGHT),
            horizontal_gap: env_positive("LAYOUT_HORIZONTAL_GAP", DEFAULT_HORIZONTAL_GAP),
            vertical_gap: env_positive("LAYOUT_VERTICAL_GAP", DEFAULT_VERTICAL_GAP),
            origin_x: 0.0,
        };

        let untyped = std::env::var("GRAPH_UNTYPED_MAPPINGS");
        let build = BuildOptions { untyped_mappings: parse_untyped_mappings(untyped.as_deref().unwrap_or("emit"))? };

        Ok(Self { port: env_parse("PORT", DEFAULT_PORT), parser, layout, build })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Geometry must be finite and positive; anything else falls back to `default`.
fn env_positive(key: &str, default: f64) -> f64 {
    let value = env_parse(key, default);
    if is_valid_length(value) { value } else { default }
}

fn parse_untyped_mappings(raw: &str) -> Result<UntypedMappingPolicy, ConfigError> {
    match raw {
        "emit" => Ok(UntypedMappingPolicy::Emit),
        "skip" => Ok(UntypedMappingPolicy::Skip),
        other => Err(ConfigError::UntypedMappingPolicy(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
