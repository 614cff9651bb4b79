//! Estrado web front-end entry point.
//!
//! Binary name: `estrado`
//!
//! Loads configuration, initializes tracing, wires services and serves the
//! HTML front-end until Ctrl+C or SIGTERM.

mod cli;
mod http;
mod state;

use std::time::Duration;

use axum::ServiceExt;
use axum::extract::Request;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use estrado_infra::config::{ConfigOverrides, apply_overrides, load_config};
use estrado_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "estrado", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.otel, verbosity_filter(cli.verbose, cli.quiet))
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let config = load_config(&cli.config).await;

    let result = match cli.command {
        Commands::Serve {
            api_base_url,
            host,
            port,
        } => {
            let config = apply_overrides(
                config,
                ConfigOverrides {
                    api_base_url,
                    host,
                    port,
                },
            );
            serve(config).await
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

async fn serve(config: estrado_types::config::FrontendConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let api_base_url = config.api_base_url.clone();
    let session_lifetime = Duration::from_secs(config.session_lifetime_minutes.saturating_mul(60));
    let state = AppState::init(config)?;
    let sweeper = state
        .sessions
        .spawn_sweeper(session_lifetime, SESSION_SWEEP_INTERVAL);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, upstream = %api_base_url, "Server listening");
    println!(
        "  {} Estrado listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!(
        "  {} {}",
        console::style("Upstream API:").dim(),
        console::style(&api_base_url).yellow()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let app = http::router::build_app(state);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
