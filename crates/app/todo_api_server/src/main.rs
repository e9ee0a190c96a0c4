//! Todo backend HTTP server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use todo_api::config::ApiConfig;
use todo_core::store::{MemoryStore, PgStore, Store};
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "todo_api_server", about = "Todo backend API server", version)]
struct Args {
    /// Port to listen on. Overrides the port in `BIND_ADDR`.
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/todo"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep users and tasks in process memory instead of PostgreSQL.
    ///
    /// Everything is lost on exit.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

/// Replace the port of `bind_addr`, keeping its host.
fn with_port(bind_addr: &str, port: u16) -> String {
    match bind_addr.rsplit_once(':') {
        Some((host, _)) => format!("{host}:{port}"),
        None => format!("{bind_addr}:{port}"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,todo_api=debug,todo_core=debug")
            }),
        )
        .init();

    let args = Args::parse();
    info!(version = todo_core::version(), "starting todo_api_server");

    let mut config = ApiConfig::from_env();
    config.database_url = args.database_url;
    if let Some(port) = args.port {
        config.bind_addr = with_port(&config.bind_addr, port);
    }

    let store: Arc<dyn Store> = if args.in_memory {
        warn!("using in-memory store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        info!(
            database_url = %config.database_url,
            max_connections = args.max_connections,
            "configuring connection pool"
        );
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;

        info!("running database migrations");
        todo_api::migrate(&pool).await?;
        Arc::new(PgStore::new(pool))
    };

    let bind_addr = config.bind_addr.clone();
    let state = todo_api::AppState::new(store, config);
    let app = todo_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    // Peer addresses feed the rate limiter and auth logging.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
