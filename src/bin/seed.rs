use dhadak_api::{
    AppConfig, Repository,
    seed::{self, SeedContent},
    storage::PostgresDocumentStore,
};
use std::sync::Arc;

/// seed
///
/// Replaces the public website content in the configured database with the bundled
/// placeholders.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,dhadak_api=info".into()),
        )
        .init();

    let content = SeedContent::bundled().expect("FATAL: bundled seed content is malformed");

    let store = PostgresDocumentStore::connect(&config.database_url, &config.db_name)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL and DB_NAME.");
    store
        .migrate()
        .await
        .expect("FATAL: Failed to apply database migrations.");
    let repo = Repository::new(Arc::new(store));

    if let Err(e) = seed::seed(&repo, content).await {
        // Debug, not Display: keeps the underlying store error.
        tracing::error!("seeding failed: {:?}", e);
        std::process::exit(1);
    }

    tracing::info!("database seeded");
}
