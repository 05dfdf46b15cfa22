// ABOUTME: joblens-server binary: parses flags, installs tracing, and serves the scrape API.
// ABOUTME: One process hosts many concurrent scrape requests over a shared read-only client.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use joblens_core::{AbsencePolicy, Client};
use joblens_server::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "joblens-server")]
#[command(about = "HTTP API for structured job-posting extraction")]
struct Args {
    /// Port to listen on
    #[arg(long = "port", env = "JOBLENS_PORT", default_value_t = 8080)]
    port: u16,

    /// Overall per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = 45)]
    timeout: u64,

    /// Omit empty fields from the formatted data payload
    #[arg(long = "elide-empty")]
    elide_empty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting joblens-server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let policy = if args.elide_empty {
        AbsencePolicy::ElideEmpty
    } else {
        AbsencePolicy::KeepEmpty
    };
    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .absence_policy(policy)
        .build();

    let state = AppState::new(client);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
