//! Binary entrypoint for the opsgraph authority server.
//!
//! See [`opsgraph_server::config`] for the environment variables it reads.

use opsgraph_server::config::ServerConfig;
use opsgraph_server::router::build_router;
use opsgraph_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config);
    let app = build_router(state);

    let addr = config.addr();
    tracing::info!(%addr, seed_demo = config.seed_demo, "opsgraph server starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
