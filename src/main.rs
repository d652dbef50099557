use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use awspulse::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let aws_repo = Arc::new(aws_repo::AwsRepo::connect().await?);
    tracing::info!(
        region = aws_repo.region(),
        account_id = aws_repo.account_id(),
        "AWS identity resolved"
    );

    // The pricing catalog lives in us-east-1 regardless of the metered region.
    let pricing_conf = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .load()
        .await;
    let price_cache = Arc::new(pricing::PriceCache::new());
    let pricing_repo = Arc::new(pricing::PricingRepo::new(
        aws_sdk_pricing::Client::new(&pricing_conf),
        price_cache,
        aws_repo.region(),
    ));

    let aggregator = Arc::new(aggregator::Aggregator::new(
        aws_repo.clone(),
        pricing_repo.clone(),
        app_config.metrics.clone(),
    ));

    let bedrock_conf = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let prompts = chat::PromptLibrary::load(std::path::Path::new(&app_config.chat.prompt_dir))?;
    let persona_chat = Arc::new(chat::PersonaChat::new(
        aws_sdk_bedrockruntime::Client::new(&bedrock_conf),
        prompts,
        app_config.chat.model_id.clone(),
        app_config.chat.max_tokens,
    ));

    let app = routes::app(aws_repo, aggregator, persona_chat, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
            }
        }
    }

    Ok(())
}
