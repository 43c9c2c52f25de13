use rusty_library_checkout::{
    adapters::postgres::{
        PostgresAuthorDirectory, PostgresBookCatalog, PostgresReservationRepository,
    },
    adapters::{GatewayActorService, SystemClock},
    api::{handlers::AppState, router::create_router},
    application::reservation::{AuthenticatedActorPolicy, BookLocks, ServiceDependencies},
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rusty_library_checkout=debug,tower_http=debug,axum=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!(
        max_connections = config.max_connections,
        "Connecting to database"
    );

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    let reservation_repository = Arc::new(PostgresReservationRepository::new(pool.clone()));
    let book_catalog = Arc::new(PostgresBookCatalog::new(pool.clone()));
    let author_directory = Arc::new(PostgresAuthorDirectory::new(pool.clone()));
    let access_policy = Arc::new(AuthenticatedActorPolicy::new(Arc::new(
        GatewayActorService,
    )));

    // Create service dependencies
    let service_deps = ServiceDependencies {
        reservation_repository,
        book_catalog,
        access_policy,
        author_directory,
        clock: Arc::new(SystemClock),
        book_locks: Arc::new(BookLocks::new()),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
