use std::{sync::Arc, time::Duration};

use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{AsyncDieselConnectionManager, deadpool::Pool},
};
use dotenv::dotenv;
use forum_api::{
    App,
    config::{Env, ServerConfig, Storage},
    forum::repository::{memory::MemoryRepository, postgres, uuid_id_generator},
};
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), eyre::Error> {
    dotenv().ok();
    init_tracing(Env::from_env());

    let config = ServerConfig::new_from_env();

    let repos = match &config.storage {
        Storage::Postgres {
            database_url,
            max_connections,
        } => {
            let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
            let pool = Pool::builder(manager)
                .max_size(*max_connections)
                .runtime(deadpool_runtime::Runtime::Tokio1)
                .wait_timeout(Some(Duration::from_secs(10)))
                .create_timeout(Some(Duration::from_secs(10)))
                .build()?;

            postgres::repositories(pool, uuid_id_generator())
        }
        Storage::Memory { dev_sessions } => {
            tracing::warn!("Using in-memory storage, nothing will be persisted");
            let store = Arc::new(MemoryRepository::new(uuid_id_generator()));
            store.seed_dev_sessions(dev_sessions).await;
            store.repositories()
        }
    };

    let listen_addr = config.listen_addr;
    let app = App { repos };

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, forum_api::router(app)).await?;

    Ok(())
}

fn init_tracing(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("forum_api=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Env::Dev | Env::Staging => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
