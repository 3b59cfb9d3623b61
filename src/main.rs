//! Resume API server: reads config from env, prepares the database, serves the routes.

use resume_api::{
    app, create_pool, ensure_database_exists, ensure_resource_tables, resource, AppState, Limits,
    PgGateway, ResourceRegistry, ServerConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resume_api=info,tower_http=info")),
        )
        .init();

    let registry = ResourceRegistry::standard();
    resource::validate(&registry)?;

    if config.bootstrap_tables {
        ensure_database_exists(&config.database_url).await?;
        let pool = create_pool(&config.database_url, &config.schema, 1).await?;
        ensure_resource_tables(&pool, &config.schema, &registry).await?;
        pool.close().await;
        tracing::info!(schema = %config.schema, "resource tables ready");
    }

    let pool = create_pool(&config.database_url, &config.schema, config.max_connections).await?;
    let state = AppState {
        gateway: Arc::new(PgGateway::new(pool)),
        registry: Arc::new(registry),
    };

    let router = app(
        state,
        Limits {
            requests_per_minute: config.rate_limit_per_minute,
            body_limit_bytes: config.body_limit_bytes,
        },
    );

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
