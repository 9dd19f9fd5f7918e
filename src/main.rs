use astgraph::config::AppConfig;
use astgraph::routes;
use astgraph::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let state = AppState::from_config(&config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, parser = %config.parser.command, "astgraph listening");
    axum::serve(listener, app).await.expect("server failed");
}
