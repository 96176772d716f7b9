use bhulekh_service::{build_router, ServiceConfig, ServiceState};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "bhulekhd", version, about = "Land-mutation workflow REST service")]
struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:8094
    #[arg(long, default_value = "127.0.0.1:8094", env = "BHULEKH_LISTEN")]
    listen: SocketAddr,
    /// Seed the demo citizens and applications at startup.
    #[arg(long, default_value_t = false, env = "BHULEKH_SEED_DEMO")]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bhulekh_service=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let state = ServiceState::bootstrap(ServiceConfig {
        seed_demo: cli.seed_demo,
    })
    .await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!("bhulekh-service REST listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
