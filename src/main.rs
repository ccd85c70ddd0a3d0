use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use feed_keeper::config::Config;
use feed_keeper::db::Repository;
use feed_keeper::feed::{build_client, BlogFetcher, QiitaFetcher};
use feed_keeper::ingest::Ingestor;
use feed_keeper::scheduler::spawn_scheduler;
use feed_keeper::web::{router, WebState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (info by default, RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    // --once runs a single cycle and exits
    let run_once = args.iter().any(|a| a == "--once");

    let config = Config::load(config_path.as_deref())?;

    // Schema creation failure is fatal: nothing starts without the tables
    let repository = Arc::new(Repository::open(&config.db_path).await?);

    let client = build_client(config.request_timeout(), config.connect_timeout())?;
    let ingestor = Ingestor::new(
        BlogFetcher::new(client.clone(), &config.blog_feed_url, config.page_size),
        QiitaFetcher::new(client, &config.qiita_items_url, config.page_size),
        Arc::clone(&repository),
    );

    if run_once {
        let report = ingestor.run_cycle().await?;
        println!(
            "Inserted {} entries ({} already stored, {} failed)",
            report.inserted, report.already_present, report.failed
        );
        return Ok(());
    }

    let scheduler = spawn_scheduler(ingestor, config.fetch_interval());

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Serving on http://{}", addr);

    let served = axum::serve(listener, router(WebState { repository })).await;

    scheduler.shutdown().await;
    served.context("HTTP server failed")?;

    Ok(())
}
