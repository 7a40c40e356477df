//! # boardscribe: Foreplay board transcripts from the command line
//!
//! A thin entrypoint; all logic lives in the `boardscribe_cli` library.

use anyhow::Result;
use boardscribe_cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup logging. Logs go to stderr so stdout stays pipeable.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("boardscribe=info".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 2. A local .env may carry FOREPLAY_API_KEY.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 3. Run and report
    if let Err(e) = run(cli).await {
        eprintln!("[boardscribe error] {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
