use anyhow::Context;
use order_server::{Config, Server, ServerState, init_logger_with_file, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env) and configuration
    setup_environment();
    let config = Config::from_env().context("invalid configuration")?;
    std::fs::create_dir_all(config.log_dir()).context("cannot prepare work directory")?;

    // 2. Logging (keep the guard alive until exit)
    let log_dir = config.log_dir();
    let _guard = init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        Some(log_dir.as_path()),
    );
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Order server starting"
    );

    // 3. State: database, directory, engine, bus
    let state = ServerState::initialize(&config).context("failed to initialize server state")?;

    // 4. HTTP server until Ctrl+C
    let server = Server::with_state(config, state);
    server.run().await.context("server error")?;

    tracing::info!("Order server stopped");
    Ok(())
}
