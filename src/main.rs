mod analysis;
mod config;
mod documents;
mod error;
mod meetings;
mod server;
mod storage;
mod tools;

use anyhow::{bail, Result};
use config::Config;
use documents::DocumentStore;
use meetings::MeetingStore;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use server::Server;
use std::sync::Arc;
use tools::ToolRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load configuration
    let config_path =
        std::env::var("ASSISTANT_TOOLS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::from_file(&config_path)?;

    // Initialize logging; RUST_LOG wins over the config level
    if std::env::var("RUST_LOG").is_ok() {
        pretty_env_logger::init();
    } else {
        pretty_env_logger::formatted_builder()
            .parse_filters(&config.logging.level)
            .init();
    }
    log::info!("Configuration loaded from {}", config_path);

    // Ensure data directories exist
    config.ensure_directories()?;

    let service = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.server.default_service.clone());

    let registry = match service.as_str() {
        "documents" => {
            let store = Arc::new(DocumentStore::open(&config.documents.data_file, "document")?);
            let count = store.read(|data| data.documents.len()).await;
            log::info!("Loaded {} documents from {}", count, store.path().display());
            ToolRegistry::documents(store, &config.documents)
        }
        "meetings" => {
            let store = Arc::new(MeetingStore::open(&config.meetings.data_file, "data")?);
            let (users, meetings) = store.read(|data| (data.users.len(), data.meetings.len())).await;
            log::info!(
                "Loaded {} users and {} meetings from {}",
                users,
                meetings,
                store.path().display()
            );
            ToolRegistry::meetings(store, &config.meetings)
        }
        other => bail!("Unknown service '{}', expected 'documents' or 'meetings'", other),
    };

    log::info!(
        "Starting {} ({} service, {} tools) on stdio",
        config.server.name,
        service,
        registry.len()
    );

    let service = Server::new(config.server.name.clone(), registry)
        .serve(stdio())
        .await?;
    service.waiting().await?;

    log::info!("Server stopped");
    Ok(())
}
