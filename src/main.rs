use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ryze::config::Config;
use ryze::feed::FeedReader;
use ryze::notify::DiscordClient;
use ryze::scheduler::{self, Scheduler};
use ryze::server;

#[derive(Parser)]
#[command(
    name = "ryze",
    about = "Relays League of Legends news from the official RSS feed to a Discord channel",
    long_about = None
)]
struct Cli {
    /// Print the version of the application
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Send the N most recent news items to Discord, then exit
    #[arg(long = "notif-news-off", value_name = "N")]
    notif_news_off: Option<usize>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, default_value = "text")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        print_version();
        return Ok(());
    }

    setup_tracing(&cli.log_format, cli.verbose);

    // Configuration failure is the only fatal startup path
    let config = Config::from_env().context("failed to load configuration")?;
    let reader = FeedReader::new(config.request_timeout)?;
    let backend = DiscordClient::new(config.discord_token.as_str(), config.request_timeout)?;

    if let Some(n) = cli.notif_news_off {
        return backfill(&config, &reader, &backend, n).await;
    }

    tracing::info!("ryze starting");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    let poller = Scheduler::new(config.clone(), reader, backend);
    let mut scheduler_rx = shutdown_rx.clone();
    let scheduler_task = tokio::spawn(async move {
        poller
            .run(async move {
                let _ = scheduler_rx.changed().await;
            })
            .await;
    });

    let mut server_rx = shutdown_rx;
    server::serve(config.http_port, async move {
        let _ = server_rx.changed().await;
    })
    .await
    .context("health-check server failed")?;

    let _ = scheduler_task.await;
    tracing::info!("ryze stopped");
    Ok(())
}

/// One-shot backfill of the last `n` items, bypassing the freshness
/// filter. Prints exactly how far delivery got on failure.
async fn backfill(
    config: &Config,
    reader: &FeedReader,
    backend: &DiscordClient,
    n: usize,
) -> Result<()> {
    if n == 0 {
        anyhow::bail!("--notif-news-off requires a count greater than 0");
    }

    match scheduler::notify_last_n(config, reader, backend, n).await {
        Ok(sent) => {
            println!("Delivered {sent} news items");
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "Backfill failed after delivering {} of {} items: {e}",
                e.delivered(),
                n
            );
            std::process::exit(1);
        }
    }
}

fn print_version() {
    println!("ryze {}", env!("CARGO_PKG_VERSION"));
    if let Some(commit) = option_env!("GIT_COMMIT") {
        println!("Commit: {commit}");
    }
}

fn setup_tracing(format: &str, verbose: bool) {
    let default_filter = if verbose {
        "ryze=debug,info"
    } else {
        "ryze=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
