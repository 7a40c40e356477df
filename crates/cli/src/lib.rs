//! # `boardscribe-cli` Library Crate
//!
//! Command definitions and handlers for the `boardscribe` binary: the board
//! extraction pipeline with file exports, plus direct access to the Foreplay
//! operations that are useful from a terminal.

use anyhow::{anyhow, bail, Context, Result};
use boardscribe::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use boardscribe::{
    catalog, extract_board_id, AdFilters, EnrichmentPipeline, EnrichmentReport, ForeplayClient,
    Page, PipelineStage,
};
use boardscribe_export::{export, file_timestamp, ExportFormat};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Bearer token for the Foreplay API.
    #[arg(long, env = "FOREPLAY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
    /// Root URL of the Foreplay API.
    #[arg(long, env = "FOREPLAY_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,
    /// Request timeout in seconds.
    #[arg(long, env = "FOREPLAY_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every video ad of a board with its transcript and write the exports
    Extract(ExtractArgs),
    /// Print the board id found in a board URL
    BoardId(BoardIdArgs),
    /// Show API usage; does not consume credits
    Usage,
    /// List the boards of the account
    Boards,
    /// Fetch a single ad
    Ad(AdArgs),
    /// Search ads across the whole catalog
    DiscoverAds(DiscoverAdsArgs),
    /// Search brands across the whole catalog
    DiscoverBrands(DiscoverBrandsArgs),
    /// Find the brands registered for a domain
    BrandsByDomain(BrandsByDomainArgs),
    /// List every operation the client knows
    Endpoints,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// A board URL (`https://app.foreplay.co/boards/<id>`) or a bare board id.
    pub board: String,
    /// Formats to write; repeat or comma-separate. Defaults to all of them.
    #[arg(long = "format", value_delimiter = ',', value_parser = parse_format)]
    pub formats: Vec<ExportFormat>,
    /// Directory the files are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Pause between ad detail requests, in milliseconds.
    #[arg(long, default_value_t = boardscribe::constants::DETAIL_FETCH_DELAY_MS)]
    pub delay_ms: u64,
    /// Page size of the board listing.
    #[arg(long, default_value_t = boardscribe::constants::BOARD_PAGE_LIMIT)]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct BoardIdArgs {
    pub input: String,
}

#[derive(Args, Debug)]
pub struct AdArgs {
    pub ad_id: String,
    /// Use the `api/ad?ad_id=` form instead of `api/ad/{id}`.
    #[arg(long)]
    pub query_form: bool,
}

#[derive(Args, Debug, Default)]
pub struct PageArgs {
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
    /// e.g. `newest`, `oldest`, `longest_running`, `most_relevant`.
    #[arg(long)]
    pub order: Option<String>,
}

impl PageArgs {
    fn is_set(&self) -> bool {
        self.limit.is_some() || self.offset.is_some() || self.order.is_some()
    }

    fn to_page(&self) -> Page {
        let mut page = Page::default();
        if let Some(limit) = self.limit {
            page = page.with_limit(limit);
        }
        if let Some(offset) = self.offset {
            page = page.with_offset(offset);
        }
        if let Some(order) = &self.order {
            page = page.with_order(order.clone());
        }
        page
    }
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub live: Option<bool>,
    #[arg(long)]
    pub display_format: Option<String>,
    #[arg(long)]
    pub publisher_platform: Option<String>,
    #[arg(long)]
    pub niche: Option<String>,
    #[arg(long)]
    pub market_target: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
}

impl From<&FilterArgs> for AdFilters {
    fn from(args: &FilterArgs) -> Self {
        AdFilters {
            start_date: args.start_date.clone(),
            end_date: args.end_date.clone(),
            live: args.live,
            display_format: args.display_format.clone(),
            publisher_platform: args.publisher_platform.clone(),
            niche: args.niche.clone(),
            market_target: args.market_target.clone(),
            language: args.language.clone(),
            search: None,
        }
    }
}

#[derive(Args, Debug)]
pub struct DiscoverAdsArgs {
    #[arg(long)]
    pub query: Option<String>,
    #[command(flatten)]
    pub filters: FilterArgs,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct DiscoverBrandsArgs {
    #[arg(long)]
    pub query: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct BrandsByDomainArgs {
    pub domain: String,
    #[command(flatten)]
    pub page: PageArgs,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse().map_err(|e: boardscribe_export::ExportError| e.to_string())
}

// --- Public Entrypoint ---

/// The main entry point for the `boardscribe` CLI.
///
/// Building the client never touches the network, and a missing API key only
/// fails once a command actually calls the API. The last credits reading is
/// printed whether the command succeeded or not.
pub async fn run(cli: Cli) -> Result<()> {
    let client = build_client(&cli.connection)?;
    let result = dispatch(&client, cli.command).await;
    if let Some(credits) = client.credits_remaining() {
        eprintln!("Credits remaining: {credits}");
    }
    result
}

async fn dispatch(client: &ForeplayClient, command: Commands) -> Result<()> {
    match command {
        Commands::Extract(args) => handle_extract(client, args).await,
        Commands::BoardId(args) => handle_board_id(&args),
        Commands::Usage => print_json(&client.usage().await?),
        Commands::Boards => print_json(&client.boards().await?),
        Commands::Ad(args) => {
            let ad = if args.query_form {
                client.ad(&args.ad_id).await?
            } else {
                client.ad_by_id(&args.ad_id).await?
            };
            print_json(&ad)
        }
        Commands::DiscoverAds(args) => {
            let ads = client
                .discover_ads(
                    args.query.as_deref(),
                    AdFilters::from(&args.filters),
                    args.page.to_page(),
                )
                .await?;
            print_json(&ads)
        }
        Commands::DiscoverBrands(args) => {
            let brands = client
                .discover_brands(args.query.as_deref(), args.page.to_page())
                .await?;
            print_json(&brands)
        }
        Commands::BrandsByDomain(args) => {
            // Without paging flags the operation's own `most_ranked` defaults apply.
            let page = args.page.is_set().then(|| args.page.to_page());
            print_json(&client.brands_by_domain(&args.domain, page).await?)
        }
        Commands::Endpoints => {
            print_catalog();
            Ok(())
        }
    }
}

// --- Command Handlers ---

fn build_client(args: &ConnectionArgs) -> Result<ForeplayClient> {
    let mut builder = ForeplayClient::builder()
        .base_url(args.base_url.clone())
        .timeout_secs(args.timeout_secs);
    if let Some(key) = &args.api_key {
        builder = builder.api_key(key.clone());
    }
    Ok(builder.build()?)
}

fn handle_board_id(args: &BoardIdArgs) -> Result<()> {
    match extract_board_id(&args.input) {
        Some(id) => {
            println!("{id}");
            Ok(())
        }
        None => bail!("Invalid URL '{}'. Expected a Foreplay board URL or a board id.", args.input),
    }
}

/// Handles `boardscribe extract`.
async fn handle_extract(client: &ForeplayClient, args: ExtractArgs) -> Result<()> {
    let board_id = extract_board_id(&args.board)
        .ok_or_else(|| anyhow!("Invalid URL '{}'. Expected a Foreplay board URL or a board id.", args.board))?;
    info!("Starting 'extract' for board {board_id}");

    let report = EnrichmentPipeline::new(client)
        .with_page_limit(args.limit)
        .with_delay(Duration::from_millis(args.delay_ms))
        .run_with_progress(&board_id, |stage| match stage {
            PipelineStage::Filtering { listed } => println!("Found {listed} ads on board {board_id}"),
            PipelineStage::DetailFetching { index, total, name } => {
                println!("[{index}/{total}] {name}")
            }
            _ => {}
        })
        .await?;

    print_summary(&report);
    if report.is_empty() {
        println!("No video ads found on this board. Nothing to write.");
        return Ok(());
    }

    let formats = if args.formats.is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        args.formats
    };
    let records = report.records();
    let timestamp = file_timestamp(&Local::now());
    for format in formats {
        let file = export(format, &board_id, &records, &timestamp)?;
        let path = file
            .save_to(&args.out_dir)
            .with_context(|| format!("Failed to write {} to {}", format, args.out_dir.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &EnrichmentReport) {
    println!(
        "{} video ads, {} with transcript, {:.0}s of video, {} segments",
        report.len(),
        report.with_transcript(),
        report.total_duration(),
        report.total_segments()
    );
    let failed = report.failed_count();
    if failed > 0 {
        println!("Detail fetch failed for {failed} ad(s):");
        for ad in report.failures() {
            println!(
                "  {} ({}): {}",
                ad.record.ad_id(),
                ad.record.name(),
                ad.error().unwrap_or_default()
            );
        }
    }
}

fn print_catalog() {
    for op in catalog() {
        println!(
            "{:<20} {:<6} {:<38} {}",
            op.name,
            op.method,
            op.path,
            if op.consumes_credits { "credits" } else { "free" }
        );
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
