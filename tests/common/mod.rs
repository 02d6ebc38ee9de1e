#![allow(dead_code)]

use poldo::configuration::{get_configuration, DatabaseSettings, Settings, StoreBackend};
use poldo::connectors::gemini_service::mock::MockGenerativeModel;
use poldo::db::{ConversationStore, InMemoryConversationStore, PgConversationStore};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::io::Write;
use std::sync::Arc;

pub const HOMELABS: &str = r#"{
    "homelab-dev": {"cpu": "45%", "memoria": "8GB / 16GB"},
    "homelab-test": {"cpu": "23%", "memoria": "4GB / 8GB"}
}"#;

pub struct TestApp {
    pub address: String,
    pub store: Arc<dyn ConversationStore>,
    pub model: Arc<MockGenerativeModel>,
    pub data_file: tempfile::NamedTempFile,
}

impl TestApp {
    pub async fn send(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/chat/send/", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Client that reports redirects instead of following them.
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn test_settings(data_file: &tempfile::NamedTempFile, backend: StoreBackend) -> Settings {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    configuration.conversation_store.backend = backend;
    configuration.homelab.data_file = data_file.path().to_string_lossy().into_owned();
    configuration
}

fn homelab_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create data file");
    file.write_all(content.as_bytes()).unwrap();
    file
}

pub async fn spawn_app_with(
    model: MockGenerativeModel,
    store: Arc<dyn ConversationStore>,
    homelabs: &str,
) -> TestApp {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let data_file = homelab_file(homelabs);
    let configuration = test_settings(&data_file, StoreBackend::Memory);
    let model = Arc::new(model);

    let server = poldo::startup::run(listener, configuration, store.clone(), model.clone())
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        model,
        data_file,
    }
}

pub async fn spawn_app(model: MockGenerativeModel) -> TestApp {
    spawn_app_with(model, Arc::new(InMemoryConversationStore::new()), HOMELABS).await
}

/// Fresh database with migrations applied, `None` when Postgres is not reachable.
pub async fn configure_database(config: &mut DatabaseSettings) -> Option<PgPool> {
    config.database_name = uuid::Uuid::new_v4().to_string();

    let mut connection = match PgConnection::connect(&config.connection_string_without_db()).await {
        Ok(connection) => connection,
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            return None;
        }
    };

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await
        .expect("Failed to create database");

    let pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to database pool");
    Some(pool)
}

pub async fn pg_store() -> Option<Arc<PgConversationStore>> {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    let pool = configure_database(&mut configuration.database).await?;
    let store = PgConversationStore::migrated(pool)
        .await
        .expect("Failed to migrate database");
    Some(Arc::new(store))
}
