use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use prometheus::Registry;
use std::sync::Arc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use pulse_feed::app::PulseApp;
use pulse_feed::cli::Cli;
use pulse_feed::config::Config;
use pulse_feed::dashboard::Layout;
use pulse_feed::logging;
use pulse_feed::metrics::FeedMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => Config::default(),
    };
    let config = Arc::new(config);

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        logging::parse_level(&config.logging.level)?
    };
    logging::init(level, config.logging.file.as_deref())?;
    info!("Starting pulse feed...");

    let metrics = FeedMetrics::new(Registry::new())?;
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        info!("Interrupt received, shutting down");
        signal_token.cancel();
    });

    let mut app = PulseApp::simulated(config.clone(), metrics.clone(), shutdown.clone());
    if let Some(sort) = cli.sort {
        app.set_sort_key(sort);
    }

    if let Some(id) = &cli.lookup {
        let token = app.lookup(id).await?;
        println!("{}", serde_json::to_string_pretty(&token)?);
        app.shutdown().await;
        return Ok(());
    }

    if !app.refresh_unless_shutdown().await? {
        app.shutdown().await;
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(app.dashboard().buckets())?);
        app.shutdown().await;
        return Ok(());
    }

    let layout = match cli.tab {
        Some(tab) => {
            app.dashboard_mut().set_active_tab(tab);
            Layout::Tab
        }
        None => Layout::Columns,
    };

    let mut frames = interval(config.dashboard.refresh());
    for frame in 0..cli.frames {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = frames.tick() => {
                match app.refresh_unless_shutdown().await {
                    Ok(true) => println!("{}", app.render_frame(layout).await),
                    Ok(false) => break,
                    Err(e) => error!("Refresh failed on frame {}: {}", frame, e),
                }
            }
        }
    }

    debug!("Metrics:\n{}", metrics.render()?);
    app.shutdown().await;
    Ok(())
}
