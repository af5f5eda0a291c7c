use storefront_server::{AppState, Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv is best-effort; variables may come from the shell)
    let _ = dotenv::dotenv();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Logging; file output only when the log dir exists
    let log_dir = format!("{}/logs", config.data_dir);
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_logger_with_file(Some(&log_level), Some(&log_dir));

    tracing::info!("Storefront server starting...");

    // 4. Initialize state (opens the database, applies schema)
    let state = AppState::initialize(&config).await;

    // 5. Run the HTTP server until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
