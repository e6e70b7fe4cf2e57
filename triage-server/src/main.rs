use std::{env, net::IpAddr, path::PathBuf};

use clap::Parser;
use colored::Colorize;
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use error_common::{log_error, Result, TriageError};
use triage_server::{create_app, ServerConfig, TriageServer};

/// Triage inference HTTP server
#[derive(Parser, Debug)]
#[command(name = "triage-server")]
#[command(about = "Diagnosis and treatment recommendations from patient vitals")]
struct Args {
    /// Server bind address
    #[arg(long, env = "TRIAGE_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Server port
    #[arg(short, long, env = "TRIAGE_PORT", default_value = "5001")]
    port: u16,

    /// Directory holding the model and encoder artifacts
    #[arg(short, long, env = "TRIAGE_ARTIFACT_DIR", default_value = "artifacts")]
    artifact_dir: PathBuf,

    /// Origin allowed to POST cross-origin (repeatable); any origin when unset
    #[arg(long = "cors-origin", env = "TRIAGE_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, env = "TRIAGE_VERBOSE")]
    verbose: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            artifact_dir: args.artifact_dir,
            cors_origins: args
                .cors_origins
                .into_iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside development
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        log_error("startup", &e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = ServerConfig::from(args);
    let addr = config.socket_addr();

    info!("🏥 {}", "Starting Triage Inference Service".bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!("🌐 Bind address: {}", addr.to_string().bright_yellow());

    let server = TriageServer::new(config)?;
    info!("✅ {}", "Model artifacts loaded".bright_green());

    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TriageError::NetworkError(format!("Failed to bind to {addr}: {e}")))?;

    info!("🚀 {}", format!("Triage service running on http://{addr}").bright_green());
    info!("📋 {}", format!("Prediction endpoint: POST http://{addr}/predict").bright_blue());
    info!("📋 {}", format!("Health check available at: http://{addr}/health").bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TriageError::ServerError(format!("HTTP server error: {e}")))?;

    info!("👋 {}", "Triage service stopped".bright_white());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    // Check if we're in development or production
    let is_development = env::var("TRIAGE_ENV").map_or(true, |v| v == "development");
    let use_colors = env::var("NO_COLOR").is_err() && atty::is(atty::Stream::Stdout);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("triage_server={level},diagnosis_engine={level},tower_http=info").into()
    });

    if is_development && use_colors {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(true)
                    .with_level(true),
            )
            .init();

        print_startup_banner();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .init();
    }
}

#[allow(clippy::print_stdout)]
fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                   🏥 TRIAGE INFERENCE SERVICE                ║".bright_cyan());
    println!("{}", "║          Diagnosis and treatment from patient vitals         ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}
