use std::sync::Arc;

use clap::{Parser, Subcommand};
use diesel_async::{
    AsyncConnection, AsyncPgConnection, async_connection_wrapper::AsyncConnectionWrapper,
};
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use tablebook_auth_service::{
    TokenIssuer,
    store::{MemoryUserStore, PgUserStore},
};
use tablebook_reservation_service::{
    establish_pool,
    store::{MemoryStore, PgStore},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod handlers;
mod models;

use config::Config;
use handlers::{ApiDoc, AppState};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Keep every record in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve { in_memory } => serve(config, in_memory).await,
        Commands::Migrate => run_migrations(config.require_database_url()?).await,
    }
}

async fn run_migrations(database_url: &str) -> Result<(), BoxError> {
    let conn = AsyncPgConnection::establish(database_url).await?;
    let mut async_wrapper: AsyncConnectionWrapper<AsyncPgConnection> =
        AsyncConnectionWrapper::from(conn);

    tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        async_wrapper.run_pending_migrations(tablebook_auth_service::MIGRATIONS)?;
        async_wrapper.run_pending_migrations(tablebook_reservation_service::MIGRATIONS)?;
        Ok(())
    })
    .await??;

    info!("migrations applied");
    Ok(())
}

async fn build_state(config: &Config, in_memory: bool) -> Result<AppState, BoxError> {
    let tokens = TokenIssuer::new(config.secret_key.as_bytes(), config.access_token_ttl);

    if in_memory {
        warn!("running with in-memory storage, records are lost on exit");
        let store = MemoryStore::new();
        return Ok(AppState::new(
            Arc::new(store.clone()),
            Arc::new(store),
            Arc::new(MemoryUserStore::new()),
            tokens,
        ));
    }

    let database_url = config.require_database_url()?;
    run_migrations(database_url).await?;

    let pool = establish_pool(database_url, config.database_pool_size)?;
    let store = PgStore::new(pool.clone());
    Ok(AppState::new(
        Arc::new(store.clone()),
        Arc::new(store),
        Arc::new(PgUserStore::new(pool)),
        tokens,
    ))
}

async fn serve(config: Config, in_memory: bool) -> Result<(), BoxError> {
    let state = build_state(&config, in_memory).await?;

    let app = handlers::router()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("API Gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
