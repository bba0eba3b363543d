use coursegate::configuration::{get_configuration, StoreBackend};
use coursegate::connectors;
use coursegate::services::{AccessStore, InMemoryAccessStore, PgAccessStore, StoreSeed};
use coursegate::startup::run;
use coursegate::telemetry::{get_subscriber, init_subscriber};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("coursegate".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().expect("Failed to read configuration.");

    let store: Arc<dyn AccessStore> = match settings.store.backend {
        StoreBackend::Postgres => {
            tracing::info!(
                db_host = %settings.database.host,
                db_port = settings.database.port,
                db_name = %settings.database.database_name,
                "Connecting to PostgreSQL"
            );
            let pg_pool = PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&settings.database.connection_string())
                .await
                .expect("Failed to connect to database.");
            sqlx::migrate!("./migrations")
                .run(&pg_pool)
                .await
                .expect("Failed to migrate database.");
            Arc::new(PgAccessStore::new(pg_pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            let store = InMemoryAccessStore::new();
            if let Some(path) = settings.store.seed_file.as_deref() {
                let contents = std::fs::read_to_string(path)
                    .unwrap_or_else(|err| panic!("Failed to read seed file {}: {}", path, err));
                let seed: StoreSeed =
                    serde_json::from_str(&contents).expect("Failed to parse seed file.");
                store.seed(seed).await;
            }
            Arc::new(store)
        }
    };

    let auth_connector = connectors::init_auth_service(&settings.auth);

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)
        .unwrap_or_else(|_| panic!("failed to bind to {}", address));

    run(listener, store, auth_connector, settings).await?.await
}
