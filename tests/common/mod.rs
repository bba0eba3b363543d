use actix_web::{get, web, App, HttpRequest, HttpResponse, HttpServer};
use chrono::{Duration, NaiveDate, Utc};
use coursegate::access::SubscriptionPlan;
use coursegate::configuration::{get_configuration, DatabaseSettings};
use coursegate::connectors;
use coursegate::models::{Course, Subscription, SubscriptionStatus};
use coursegate::services::{AccessStore, InMemoryAccessStore};
use coursegate::telemetry::{get_subscriber, init_subscriber};
use serde_json::json;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use std::sync::{Arc, OnceLock};

static TRACING: OnceLock<()> = OnceLock::new();

// Logs are swallowed unless TEST_LOG is set.
fn init_tracing() {
    TRACING.get_or_init(|| {
        let name = "test".to_string();
        let level = "debug".to_string();
        if std::env::var("TEST_LOG").is_ok() {
            init_subscriber(get_subscriber(name, level, std::io::stdout));
        } else {
            init_subscriber(get_subscriber(name, level, std::io::sink));
        }
    });
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryAccessStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_as(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn subscribe(&self, user_id: &str, plan: SubscriptionPlan, status: SubscriptionStatus, end_date: NaiveDate) {
        self.store
            .put_subscription(
                user_id,
                Subscription {
                    plan,
                    start_date: end_date - Duration::days(365),
                    end_date,
                    status,
                },
            )
            .await;
    }

    pub async fn add_course(&self, id: &str, min_plan: SubscriptionPlan) {
        self.store
            .put_course(Course {
                id: id.to_string(),
                min_plan,
            })
            .await;
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn spawn_app() -> TestApp {
    init_tracing();

    let mut configuration = get_configuration().expect("Failed to get configuration");

    let auth_listener =
        TcpListener::bind("127.0.0.1:0").expect("Failed to bind port for testing auth server");
    configuration.auth.enabled = true;
    configuration.auth.url = format!(
        "http://127.0.0.1:{}/me",
        auth_listener.local_addr().unwrap().port()
    );
    // every request goes to the mock auth server
    configuration.auth.cache_ttl_secs = 0;
    let _ = tokio::spawn(mock_auth_server(auth_listener));

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryAccessStore::new());
    let auth_connector = connectors::init_auth_service(&configuration.auth);
    let server = coursegate::startup::run(
        listener,
        store.clone() as Arc<dyn AccessStore>,
        auth_connector,
        configuration,
    )
    .await
    .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

/// Fresh, migrated database named after a random uuid.
/// `None` when Postgres is unreachable, so callers can skip.
pub async fn spawn_database() -> Option<PgPool> {
    init_tracing();

    let mut configuration = get_configuration().expect("Failed to get configuration");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    match configure_database(&configuration.database).await {
        Ok(pool) => Some(pool),
        Err(err) => {
            eprintln!("Skipping test: failed to connect to postgres: {}", err);
            None
        }
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await?;

    Ok(connection_pool)
}

/// Resolves `Bearer <user id>` to that user; the token `revoked` is rejected.
#[get("")]
async fn mock_auth(req: HttpRequest) -> HttpResponse {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();

    if token.is_empty() || token == "revoked" {
        return HttpResponse::Unauthorized().finish();
    }

    HttpResponse::Ok().json(json!({
        "user": {
            "_id": token,
            "email": format!("{}@example.com", token),
            "role": "student",
        }
    }))
}

fn mock_auth_server(listener: TcpListener) -> actix_web::dev::Server {
    HttpServer::new(|| App::new().service(web::scope("/me").service(mock_auth)))
        .listen(listener)
        .unwrap()
        .run()
}
