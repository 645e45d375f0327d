// src/main.rs

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use carbon_market::config::{Config, RATE_LIMIT_SWEEP_SECS};
use carbon_market::routes;
use carbon_market::security::rate_limit::spawn_sweep_task;
use carbon_market::seed::{seed_default_admin, seed_demo_catalog};
use carbon_market::state::AppState;
use carbon_market::store::Store;
use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Store Pool with Retry
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    let mut retry_count = 0;
    let pool = loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options.clone())
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to open store after 5 retries: {}", e);
                }
                tracing::warn!("Store not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Store opened...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run store migrations");
    tracing::info!("Migrations applied successfully.");

    let store = Store::new(pool);

    // Seed Admin User
    if let Err(e) = seed_default_admin(&store, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    // Seed demo catalog on first run
    if config.seed_demo_listings {
        if let Err(e) = seed_demo_catalog(&store).await {
            tracing::error!("Failed to seed demo catalog: {:?}", e);
        }
    }

    // Create AppState
    let state = AppState::new(store, config);

    // Background sweep keeps the rate-limit table bounded
    spawn_sweep_task(state.rate_limiter.clone(), RATE_LIMIT_SWEEP_SECS);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
