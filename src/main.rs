use poldo::configuration::{get_configuration, StoreBackend};
use poldo::connectors;
use poldo::db::{ConversationStore, InMemoryConversationStore, PgConversationStore};
use poldo::startup::run;
use poldo::telemetry::{get_subscriber, init_subscriber};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("poldo".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().expect("Failed to read configuration.");

    let store: Arc<dyn ConversationStore> = match settings.conversation_store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory conversation store, history is lost on restart");
            Arc::new(InMemoryConversationStore::new())
        }
        StoreBackend::Postgres => {
            tracing::info!(
                db_host = %settings.database.host,
                db_port = settings.database.port,
                db_name = %settings.database.database_name,
                "Connecting to PostgreSQL"
            );

            let connect_options = PgConnectOptions::new()
                .host(&settings.database.host)
                .port(settings.database.port)
                .username(&settings.database.username)
                .password(&settings.database.password)
                .database(&settings.database.database_name)
                .ssl_mode(PgSslMode::Disable);

            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(30))
                .connect_with(connect_options)
                .await
                .expect("Failed to connect to database.");

            let store = PgConversationStore::migrated(pg_pool)
                .await
                .expect("Failed to run database migrations.");
            Arc::new(store)
        }
    };

    let model = connectors::init_gemini(&settings.gemini);

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener =
        TcpListener::bind(&address).unwrap_or_else(|_| panic!("failed to bind to {}", address));

    run(listener, settings, store, model).await?.await
}
