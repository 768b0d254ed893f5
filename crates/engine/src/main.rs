//! Cyoa Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cyoa_engine::config::{EngineConfig, StoryStoreConfig};
use cyoa_engine::infrastructure::{
    clock::{SystemClock, SystemRandom, TokioSleeper},
    easy_diffusion::EasyDiffusionTransport,
    image_render::{ImageRenderClient, RenderDefaults, SEED_RANGE},
    memory_store::InMemoryStoryRepo,
    openai::OpenAiClient,
    ports::{ClockPort, RandomPort, StoryRepo},
    sqlite_store::SqliteStoryRepo,
};
use cyoa_engine::{api, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cyoa_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cyoa Engine");

    let config = EngineConfig::from_env()?;

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom);

    // Story storage
    let stories: Arc<dyn StoryRepo> = match &config.store {
        StoryStoreConfig::Sqlite(path) => {
            tracing::info!(path = %path, "Opening SQLite story store");
            Arc::new(SqliteStoryRepo::new(path, clock.clone()).await?)
        }
        StoryStoreConfig::Memory => {
            tracing::warn!("Using in-memory story store; stories are lost on restart");
            Arc::new(InMemoryStoryRepo::new())
        }
    };

    // Storyteller
    if config.openai.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; chat requests will be rejected");
    }
    let llm = Arc::new(OpenAiClient::new(
        &config.openai.base_url,
        &config.openai.api_key,
        &config.openai.model,
    ));
    tracing::info!(
        model = %config.openai.model,
        temperature = config.openai.temperature,
        "Chat backend configured"
    );

    // Renderer; the seed is fixed for the process lifetime
    let seed = random.gen_range(0, (SEED_RANGE - 1) as i32) as u64;
    let transport = Arc::new(EasyDiffusionTransport::new(
        &config.render.base_url,
        config.render.access.clone(),
    ));
    let images = Arc::new(ImageRenderClient::new(
        transport,
        Arc::new(TokioSleeper),
        RenderDefaults::with_seed(seed),
        config.render.model.clone(),
        config.render.poll,
    ));
    tracing::info!(
        base_url = %config.render.base_url,
        seed,
        poll_interval_ms = config.render.poll.interval.as_millis() as u64,
        max_polls = ?config.render.poll.max_attempts,
        "Render backend configured"
    );

    let app = Arc::new(App::new(
        stories,
        llm,
        images,
        random,
        config.openai.temperature,
    ));

    let router = api::router(app, &config.cors_allowed_origins).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.listen_addr().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
