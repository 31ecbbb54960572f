use dotenvy::dotenv;
use registrar::router::init_router;
use registrar::state::init_app_state;
use registrar_config::ServerConfig;
use registrar_observability::init_logging;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let state = init_app_state().await?;
    let app = init_router(state);

    let server = ServerConfig::from_env();
    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(address = %address, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", address);

    axum::serve(listener, app).await?;
    Ok(())
}
