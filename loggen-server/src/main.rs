// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Loggen — synthetic access-log emitter
//
//  Config:   HOST / LOG_FILE / LOG_SPEED env (+ optional YAML)
//  Loop:     one tokio interval tick → one JSON line appended
//  Errors:   every failure is fatal, diagnostics on stderr
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::Context;
use clap::Parser;
use loggen_core::config::EmitterConfig;
use loggen_core::generator::{DefaultSource, SystemClock};
use loggen_emitter::scheduler::{Emitter, IntervalTicker};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "loggen", version, about = "Loggen — synthetic web access-log emitter")]
struct Cli {
    /// Optional YAML file (vocabulary, defaults for HOST/LOG_FILE/LOG_SPEED).
    /// Environment variables take precedence over it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Loggen starting");

    // ── Config ──
    let config = match EmitterConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Invalid configuration");
            return Err(e).context("failed to load configuration");
        }
    };

    info!(
        host = %config.host,
        file = %config.log_file.display(),
        rate = config.log_speed,
        interval_ms = config.interval().as_secs_f64() * 1000.0,
        "Configuration loaded"
    );

    // ── Runtime ──
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    rt.block_on(run(config))
}

async fn run(config: EmitterConfig) -> anyhow::Result<()> {
    let mut emitter = Emitter::new(config, SystemClock, DefaultSource::from_entropy());
    let mut ticker = match IntervalTicker::new(emitter.config().interval()) {
        Ok(ticker) => ticker,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Invalid emission interval");
            return Err(e).context("failed to start emission timer");
        }
    };

    // Cancelling `emitter.run` can only interrupt the tick wait, so a
    // signal never cuts an append short.
    tokio::select! {
        result = emitter.run(&mut ticker) => {
            match result {
                Ok(written) => info!(written, "Emitter finished"),
                Err(e) => {
                    error!(kind = e.kind(), error = %e, written = emitter.emitted(), "Emission failed");
                    return Err(e).context("emission failed");
                }
            }
        }
        signal = shutdown_signal() => {
            info!(signal, written = emitter.emitted(), "Shutdown signal received, stopping");
        }
    }

    info!("Loggen stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM (docker stop).
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
