//! Zekompanion server - users and badge imagery for the e-paper companion

use std::sync::Arc;

use artifact_store::FsArtifactStore;
use profile_imagery::ImagePipeline;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use user_identity::{JsonUserRepository, UserRepository};

use zekompanion_server::{create_router, AppState, Config, OfflineGenerator, UserService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("zekompanion_server=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::from_env();
    info!(port = config.port, "Starting zekompanion-server");
    info!("Profiles dir: {:?}", config.profiles_dir);

    let repository: Arc<dyn UserRepository> = match &config.users_file {
        Some(path) => {
            info!("Users file: {:?}", path);
            Arc::new(JsonUserRepository::open(path).await?)
        }
        None => {
            info!("Users file disabled, keeping users in memory");
            Arc::new(JsonUserRepository::in_memory())
        }
    };

    let store = FsArtifactStore::new(&config.profiles_dir);
    store.init().await?;
    let pipeline = ImagePipeline::new(Arc::new(store))?;

    let generator = Arc::new(OfflineGenerator::new(config.seed()));

    if config.admin_token.is_none() {
        info!("ADMIN_TOKEN not set, every caller is unauthorized");
    }

    let service = UserService::new(repository, pipeline, generator);
    let state = AppState::new(service, config.admin_token.clone());
    let app = create_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!(port = config.port, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
