//! Wiring & DI. Entry point: bootstrap adapters, inject into the chat service, serve HTTP.
//! No business logic here.

use campus_chat::adapters::ai::RemoteClassifier;
use campus_chat::adapters::http::create_router;
use campus_chat::adapters::persistence::{load_catalog, MemoryStore, SqliteRepo};
use campus_chat::domain::Catalog;
use campus_chat::ports::{CatalogPort, ChatPort, ExchangeLogPort, FeedbackPort, IntentClassifier};
use campus_chat::shared::config::{AppConfig, StorageKind};
use campus_chat::usecases::{build_classifier, ChatService, FallbackPolicy};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Storage handles for the three outbound data ports.
struct Stores {
    catalog: Arc<dyn CatalogPort>,
    feedback: Arc<dyn FeedbackPort>,
    exchanges: Arc<dyn ExchangeLogPort>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let seed = match &cfg.seed_path {
        Some(path) => {
            let catalog = load_catalog(path)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            info!(path = %path, "loaded seed catalog");
            Some(catalog)
        }
        None => None,
    };

    let stores = open_stores(&cfg, seed).await?;

    // --- Classifier chain ---
    let policy: FallbackPolicy = cfg
        .classifier_fallback_or_default()
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let remote: Option<Arc<dyn IntentClassifier>> = match cfg.classifier_api_key() {
        Some(key) => {
            let timeout_ms = cfg.classifier_timeout_ms_or_default();
            info!(
                model = %cfg.classifier_model_or_default(),
                url = %cfg.classifier_url_or_default(),
                timeout_ms,
                policy = ?policy,
                "remote intent classifier enabled"
            );
            Some(Arc::new(
                RemoteClassifier::new(
                    cfg.classifier_url_or_default(),
                    key,
                    cfg.classifier_model_or_default(),
                    Duration::from_millis(timeout_ms),
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            ))
        }
        None => {
            warn!("CAMPUS_CHAT_CLASSIFIER_API_KEY not set, classifying with keyword rules only");
            None
        }
    };
    let classifier = build_classifier(remote, policy);

    // --- Service & HTTP ---
    let chat: Arc<dyn ChatPort> = Arc::new(ChatService::new(
        classifier,
        stores.catalog,
        stores.feedback,
        stores.exchanges,
    ));
    let app = create_router(chat);

    let bind_addr = cfg.bind_addr_or_default();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {}", bind_addr, e))?;
    info!(addr = %bind_addr, "campus-chat listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Open the configured store. SQLite is seeded only while it holds no catalog rows.
async fn open_stores(cfg: &AppConfig, seed: Option<Catalog>) -> anyhow::Result<Stores> {
    match cfg.storage_or_default() {
        StorageKind::Memory => {
            let store = Arc::new(MemoryStore::from_catalog(seed.unwrap_or_default()));
            info!("using in-memory storage");
            Ok(Stores {
                catalog: Arc::clone(&store) as Arc<dyn CatalogPort>,
                feedback: Arc::clone(&store) as Arc<dyn FeedbackPort>,
                exchanges: store as Arc<dyn ExchangeLogPort>,
            })
        }
        StorageKind::Sqlite => {
            let data_dir = PathBuf::from(cfg.data_dir_or_default());
            let repo = Arc::new(
                SqliteRepo::connect(&data_dir)
                    .await
                    .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
            );
            info!(path = %repo.db_path().display(), "using SQLite storage");
            if let Some(catalog) = &seed {
                let seeded = repo
                    .seed_if_empty(catalog)
                    .await
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                if seeded {
                    info!("seeded empty database from catalog");
                } else {
                    info!("database already holds a catalog, seed skipped");
                }
            }
            Ok(Stores {
                catalog: Arc::clone(&repo) as Arc<dyn CatalogPort>,
                feedback: Arc::clone(&repo) as Arc<dyn FeedbackPort>,
                exchanges: repo as Arc<dyn ExchangeLogPort>,
            })
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
