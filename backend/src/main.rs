use eu_por_inteiro::backend::{config::AppConfig, create_router, initialize_backend};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `log` records from the services are bridged into the same subscriber
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    info!("Data directory: {}", config.data_directory.display());

    let bind_address = config.bind_address.clone();
    let app_state = initialize_backend(config).await?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
