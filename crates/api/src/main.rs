use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use movieflix_api::config::ServerConfig;
use movieflix_api::router::build_app_router;
use movieflix_api::services::movie::MovieService;
use movieflix_api::state::AppState;
use movieflix_core::storage::LocalFileStorage;
use movieflix_db::store::PgMovieStore;
use movieflix_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "movieflix_api=debug,movieflix_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        poster_dir = %config.poster_dir.display(),
        base_url = %config.base_url,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded server configuration"
    );

    let pool = connect_database().await;

    tokio::fs::create_dir_all(&config.poster_dir)
        .await
        .expect("Failed to create poster directory");

    let app = build_app_router(build_state(&config, pool), &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Movieflix API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter
/// and `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

/// Connect to `DATABASE_URL`, verify it answers and bring the schema up to date.
async fn connect_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = movieflix_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    movieflix_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    movieflix_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

fn build_state(config: &ServerConfig, pool: DbPool) -> AppState {
    let movies = MovieService::new(
        Arc::new(PgMovieStore::new(pool)),
        Arc::new(LocalFileStorage::new()),
        config.movie_service_config(),
    );
    AppState {
        movies: Arc::new(movies),
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, shutting down"),
        () = terminate => tracing::info!("Terminated, shutting down"),
    }
}
