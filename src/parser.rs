//! External parser collaborator.
//!
//! DESIGN
//! ======
//! Source text is handed to a parser process that prints the syntax tree as
//! JSON (by default `stree json <file>`). The code is written to a uniquely
//! named temp file, the command runs with a timeout, and stdout is checked
//! to be a single JSON document. The document is kept as raw text: callers
//! that only relay it never decode it, so nesting depth is unbounded here.
//! The temp file is removed whether or not the command succeeds.
//!
//! The [`SyntaxParser`] trait is the seam route handlers depend on, so tests
//! can substitute a canned parser.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde_json::value::RawValue;
use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_PARSER_COMMAND: &str = "stree";
pub const DEFAULT_PARSER_ARGS: &[&str] = &["json"];
pub const DEFAULT_PARSER_FILE_SUFFIX: &str = ".rb";
pub const DEFAULT_PARSER_TIMEOUT_SECS: u64 = 10;

/// Longest stderr excerpt carried in an error.
const STDERR_EXCERPT_LEN: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to write temporary source file: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parser timed out after {millis}ms")]
    Timeout { millis: u128 },
    #[error("parser exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("parser produced invalid JSON: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// Turns source text into a JSON syntax tree.
#[async_trait::async_trait]
pub trait SyntaxParser: Send + Sync {
    /// Parse `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the parser cannot run, fails, or emits something other than JSON.
    async fn parse(&self, code: &str) -> Result<Box<RawValue>, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Appended to the temp file name; some parsers pick a grammar from it.
    pub file_suffix: String,
    pub timeout: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PARSER_COMMAND.to_owned(),
            args: DEFAULT_PARSER_ARGS.iter().map(|s| (*s).to_owned()).collect(),
            file_suffix: DEFAULT_PARSER_FILE_SUFFIX.to_owned(),
            timeout: Duration::from_secs(DEFAULT_PARSER_TIMEOUT_SECS),
        }
    }
}

/// Runs an external command per request.
#[derive(Debug, Clone)]
pub struct CommandParser {
    config: ParserConfig,
}

impl CommandParser {
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn temp_path(&self) -> PathBuf {
        std::env::temp_dir().join(format!("code-{}{}", Uuid::new_v4(), self.config.file_suffix))
    }

    async fn run(&self, path: &Path) -> Result<Box<RawValue>, ParseError> {
        let child = Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ParseError::Spawn { command: self.config.command.clone(), source })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| ParseError::Timeout { millis: self.config.timeout.as_millis() })?
            .map_err(|source| ParseError::Spawn { command: self.config.command.clone(), source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParseError::Failed {
                status: output.status.to_string(),
                stderr: stderr.chars().take(STDERR_EXCERPT_LEN).collect::<String>().trim().to_owned(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[async_trait::async_trait]
impl SyntaxParser for CommandParser {
    async fn parse(&self, code: &str) -> Result<Box<RawValue>, ParseError> {
        let path = self.temp_path();
        tokio::fs::write(&path, code).await.map_err(ParseError::TempFile)?;
        debug!(path = %path.display(), bytes = code.len(), command = %self.config.command, "running parser");

        let result = self.run(&path).await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "failed to remove temporary source file");
        }
        result
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
