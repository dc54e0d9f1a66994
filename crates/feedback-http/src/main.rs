//! `feedback-server`: HTTP front end of the feedback engine

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use feedback_core::{FeedbackConfig, FeedbackGenerator, FeedbackOrchestrator};
use feedback_http::{routes, ChatCompletionGenerator};
use feedback_store::{FilePatternStore, MemoryPatternStore, PatternStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("feedback-server")
        .version(feedback_http::VERSION)
        .about("Personalized feedback engine HTTP server")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address, overrides http.bind"),
        )
        .arg(
            Arg::new("store-dir")
                .long("store-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Persist pattern sets under this directory, overrides cache.store_dir"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .get_matches();

    init_tracing(matches.get_flag("json-logs"));

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => FeedbackConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FeedbackConfig::default(),
    };
    if let Some(bind) = matches.get_one::<SocketAddr>("bind") {
        config.http.bind = *bind;
    }
    if let Some(dir) = matches.get_one::<PathBuf>("store-dir") {
        config.cache.store_dir = Some(dir.clone());
    }
    config.validate()?;

    let store: Arc<dyn PatternStore> = match &config.cache.store_dir {
        Some(dir) => {
            let store = FilePatternStore::open(dir.clone())
                .await
                .with_context(|| format!("opening pattern store at {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), "using file pattern store");
            Arc::new(store)
        }
        None => {
            tracing::info!(max_entries = config.cache.max_entries, "using in-memory pattern store");
            Arc::new(MemoryPatternStore::new(config.cache.max_entries))
        }
    };

    let chat = ChatCompletionGenerator::new(config.llm.clone());
    if !chat.has_api_key() {
        tracing::warn!(
            env = %config.llm.api_key_env,
            "no API key configured, generation will fail and default patterns will be served"
        );
    }
    let generator: Arc<dyn FeedbackGenerator> = Arc::new(chat);

    let bind = config.http.bind;
    let orchestrator = Arc::new(FeedbackOrchestrator::new(generator, store, config));

    let (addr, server) = warp::serve(routes(orchestrator))
        .try_bind_with_graceful_shutdown(bind, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .with_context(|| format!("binding {bind}"))?;

    tracing::info!(%addr, "feedback server listening");
    server.await;
    tracing::info!("feedback server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
