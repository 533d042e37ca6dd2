use order_server::utils::logger;
use order_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    logger::init_logger(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(environment = %config.environment, "Order server starting");

    std::fs::create_dir_all(&config.work_dir)?;
    let state = ServerState::initialize(&config)?;

    Server::with_state(config, state).run().await
}
