//! Trending Digest Bot — Binary Entrypoint
//! Boots the schedule loop, the Telegram command listener, and the
//! liveness HTTP server.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use github_trending_digest::api;
use github_trending_digest::commands;
use github_trending_digest::config::DigestConfig;
use github_trending_digest::enrich::translate::GoogleTranslator;
use github_trending_digest::fetch::github::GithubSearchProvider;
use github_trending_digest::metrics::Metrics;
use github_trending_digest::notify::telegram::{self, TelegramBot};
use github_trending_digest::pipeline::DigestPipeline;
use github_trending_digest::scheduler;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = DigestConfig::load_default().context("loading digest config")?;
    let schedule = cfg.schedule().context("parsing digest schedule")?;

    let bot = TelegramBot::from_env().context("telegram credentials")?;
    let default_destination = telegram::default_destination_from_env();
    if default_destination.is_none() {
        tracing::warn!(
            "TARGET_CHAT_ID not set; scheduled digests are skipped until it is configured"
        );
    }

    let metrics = Metrics::init();

    let provider = Box::new(GithubSearchProvider::new(cfg.pool_size));
    let translator = Box::new(GoogleTranslator::new());
    let pipeline = Arc::new(DigestPipeline::new(
        cfg,
        provider,
        translator,
        Box::new(bot.clone()),
    ));

    let _schedule_loop = scheduler::spawn_schedule_loop(pipeline.clone(), schedule, default_destination);
    let _command_loop = tokio::spawn(commands::run_command_loop(bot, pipeline));

    // Host platforms inject PORT; 8080 is the local default.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let router = api::create_router().merge(metrics.router());

    tracing::info!(%addr, "liveness endpoint up");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding liveness port")?;
    axum::serve(listener, router)
        .await
        .context("liveness server")?;
    Ok(())
}
