use rota_gateway::{GatewayState, config::GatewayConfig, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rota_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    config.validate()?;

    tracing::info!(
        "Forwarding /api/* to {} (default timeout {:?}, generate timeout {:?})",
        config.backend_url,
        config.default_timeout,
        config.generate_timeout
    );

    let bind_addr = config.bind_addr.clone();
    let app = create_router(GatewayState::new(config)?);

    tracing::info!("Gateway listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
