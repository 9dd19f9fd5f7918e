use std::path::{Path, PathBuf};

use astgraph::graph::layout::{
    DEFAULT_HORIZONTAL_GAP, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, DEFAULT_VERTICAL_GAP, is_valid_length,
};
use astgraph::graph::{
    self, BuildOptions, DecodeError, GraphBuilder, LayoutConfig, TreeLayoutEngine, UntypedMappingPolicy,
};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tokio::io::AsyncReadExt;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid syntax tree: {0}")]
    InvalidTree(#[from] DecodeError),
}

#[derive(Parser, Debug)]
#[command(name = "astgraph-cli", about = "Syntax tree graph CLI")]
struct Cli {
    #[arg(long, env = "ASTGRAPH_BASE_URL", default_value = "http://127.0.0.1:4000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Parse a source file on the server and print its syntax tree.
    Parse(SourceArgs),
    /// Parse a source file on the server and print its positioned graph.
    Graph(SourceArgs),
    /// Lay out a syntax tree JSON file locally, without a server.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    #[arg(default_value = "-", help = "Source file path, or - for stdin")]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[arg(default_value = "-", help = "Syntax tree JSON path, or - for stdin")]
    input: PathBuf,

    #[arg(long, help = "Descend into untyped mappings without emitting nodes for them")]
    skip_untyped: bool,

    #[arg(long, default_value_t = DEFAULT_NODE_WIDTH, value_parser = positive_length)]
    node_width: f64,

    #[arg(long, default_value_t = DEFAULT_NODE_HEIGHT, value_parser = positive_length)]
    node_height: f64,

    #[arg(long, default_value_t = DEFAULT_HORIZONTAL_GAP, value_parser = positive_length)]
    horizontal_gap: f64,

    #[arg(long, default_value_t = DEFAULT_VERTICAL_GAP, value_parser = positive_length)]
    vertical_gap: f64,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let base_url = cli.base_url.trim_end_matches('/').to_owned();

    match cli.command {
        Command::Ping => run_ping(&base_url).await,
        Command::Parse(args) => run_remote(&base_url, "/parse", args).await,
        Command::Graph(args) => run_remote(&base_url, "/graph", args).await,
        Command::Layout(args) => run_layout(args).await,
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let response = reqwest::Client::new().get(format!("{base_url}/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_remote(base_url: &str, path: &str, args: SourceArgs) -> Result<(), CliError> {
    let code = read_input(&args.input).await?;
    let body = api_request(base_url, path, &json!({ "code": code })).await?;
    print_document(&body)
}

async fn run_layout(args: LayoutArgs) -> Result<(), CliError> {
    let raw = read_input(&args.input).await?;
    let doc = graph::decode_tree(raw.as_bytes())?;

    let untyped_mappings = if args.skip_untyped { UntypedMappingPolicy::Skip } else { UntypedMappingPolicy::Emit };
    let builder = GraphBuilder::new(BuildOptions { untyped_mappings });
    let engine = TreeLayoutEngine::new(LayoutConfig {
        node_width: args.node_width,
        node_height: args.node_height,
        horizontal_gap: args.horizontal_gap,
        vertical_gap: args.vertical_gap,
        ..LayoutConfig::default()
    });

    let rendered = graph::render_json(doc, &builder, &engine);
    print_json(&serde_json::to_value(&rendered)?)
}

/// POST `body` and return the response text. Trees from `/parse` may nest
/// past serde_json's default limit, so decoding is left to the caller.
async fn api_request(base_url: &str, path: &str, body: &Value) -> Result<String, CliError> {
    let response = reqwest::Client::new().post(format!("{base_url}{path}")).json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    Ok(response.text().await?)
}

async fn read_input(input: &Path) -> Result<String, CliError> {
    let read_err = |source| CliError::Read { path: input.display().to_string(), source };
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await.map_err(read_err)?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(input).await.map_err(read_err)
}

/// Layout geometry must be finite and positive.
fn positive_length(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|e| format!("{e}"))?;
    if is_valid_length(value) {
        Ok(value)
    } else {
        Err(format!("expected a finite number greater than zero, got {raw}"))
    }
}

/// Pretty-print a JSON document; documents too deep to decode are printed as received.
fn print_document(body: &str) -> Result<(), CliError> {
    match graph::decode_tree(body.as_bytes()) {
        Ok(value) => print_json(&value),
        Err(DecodeError::TooDeep { .. }) => {
            println!("{}", body.trim_end());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
