//! Emotion sensor harness binary.

use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facemood_cli::{run_session, CliConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("facemood_sensor=info,facemood_cli=info"));

    // Events go to stdout; logs go to stderr.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting facemood");

    let config = CliConfig::from_env();
    info!("Config: {:?}", config);

    if let Some(addr) = config.metrics_addr {
        if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
            error!("Failed to start metrics exporter on {}: {}", addr, e);
            std::process::exit(1);
        }
        info!("Serving metrics on {}", addr);
    }

    let mut stdout = std::io::stdout().lock();
    match run_session(&config, &mut stdout, shutdown_signal(config.run_for)).await {
        Ok(_) => info!("Shutdown complete"),
        Err(e) => {
            error!("Sensor session failed: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Resolves on Ctrl-C, or after `run_for` if set.
async fn shutdown_signal(run_for: Option<Duration>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
    };

    match run_for {
        Some(duration) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = tokio::time::sleep(duration) => info!("Run time elapsed"),
            }
        }
        None => ctrl_c.await,
    }
}
