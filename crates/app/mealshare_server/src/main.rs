//! Mealshare API server binary.

use clap::Parser;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "mealshare_server", about = "Mealshare API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/mealshare"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Bounded wait for a pooled connection, in seconds.
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    acquire_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,mealshare_api=debug,mealshare_core=debug".parse().unwrap()
            }),
        )
        .init();

    let args = Args::parse();

    info!(
        bind_addr = %args.bind_addr,
        max_connections = args.max_connections,
        "starting mealshare_server"
    );

    let config = mealshare_api::config::ApiConfig {
        bind_addr: args.bind_addr,
        database_url: args.database_url,
        jwt_secret: mealshare_core::auth::jwt::resolve_jwt_secret(),
        max_connections: args.max_connections,
        acquire_timeout_secs: args.acquire_timeout_secs,
    };

    let pool = mealshare_core::store::connect(&config.store_config()).await?;

    info!("running database migrations");
    mealshare_api::migrate(&pool).await?;

    let state = mealshare_api::AppState {
        pool,
        config: config.clone(),
    };
    let app = mealshare_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
