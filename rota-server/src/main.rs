use rota_server::{api, config::Config, db, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rota_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Rota Server...");

    let config = Config::from_env();
    config.validate()?;

    tracing::info!("Connecting to database...");

    let pool = db::create_pool(&config.database_url, config.max_connections).await?;

    tracing::info!("Database connection pool created");

    db::run_migrations(&pool).await?;

    tracing::info!(
        "Solver command: {} {}",
        config.solver_command,
        config.solver_args.join(" ")
    );

    // Build router with all API endpoints
    let state = AppState::from_config(pool, &config);
    let app = api::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
