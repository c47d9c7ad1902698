use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audiobook_gateway::{
    bootstrap_admin, config::Config, create_app, handlers::AppState, store::create_backend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audiobook_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(
        "Starting audiobook gateway in {:?} mode with {:?} store",
        config.environment,
        config.store_backend
    );

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set; signing tokens with the development secret");
    }

    let backend = create_backend(&config)
        .await
        .context("failed to initialise the credential store")?;

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, backend).context("failed to build application state")?;

    bootstrap_admin(&state)
        .await
        .context("failed to bootstrap the admin account")?;

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
