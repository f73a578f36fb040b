//! Command-line entry point.
//!
//! The binary is a thin shell around the library: it parses flags, loads the
//! configuration, installs logging, and drives the event loop on a tokio
//! runtime.
//!
//! # Event Mapping
//!
//! In `watch` mode every stdin line becomes one library event:
//!
//! - `:r` → `Event::Refetch`
//! - `:q` or end of input → `Event::Quit`
//! - anything else → `Event::SetQuery(line)` (an empty line clears the filter)
//!
//! Worker completions arrive on the event channel and are dispatched the same
//! way. The frame is redrawn whenever dispatch reports a visible change.

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use cryptodash::domain::{AssetDetails, SearchHit};
use cryptodash::source::PriceSource;
use cryptodash::{
    observability, ui, CoinGeckoSource, Config, Dashboard, DashboardWorker, Event, Result,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::Instrument;

/// Terminal cryptocurrency market dashboard
#[derive(Parser)]
#[command(name = "cryptodash")]
#[command(version)]
#[command(about = "Terminal cryptocurrency market dashboard", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Quote currency (e.g. usd, eur)
    #[arg(long, global = true)]
    vs_currency: Option<String>,

    /// Number of top assets to fetch
    #[arg(long, global = true)]
    per_page: Option<u32>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log file path, or - for stderr
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard (default): type to filter, :r to refresh, :q to quit
    Watch {
        /// Filter debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Fetch once, print the (optionally filtered) table and exit
    Top {
        /// Name or symbol substring
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show details of a single coin by its id (e.g. bitcoin)
    Details { id: String },

    /// Search coins on the remote API
    Search {
        /// Free-text query (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(vs_currency) = &self.vs_currency {
            config.vs_currency.clone_from(vs_currency);
        }
        if let Some(per_page) = self.per_page {
            config.per_page = per_page;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level.clone_from(log_level);
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if let Some(Commands::Watch {
            debounce_ms: Some(ms),
        }) = self.command
        {
            config.debounce_ms = ms;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut config, rejected) = match Config::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    cli.apply_overrides(&mut config);
    observability::init_tracing(&config);
    for setting in &rejected {
        setting.warn();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let command = cli.command.unwrap_or(Commands::Watch { debounce_ms: None });
    match runtime.block_on(run(command, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    let source = CoinGeckoSource::from_config(config)?;
    match command {
        Commands::Watch { .. } => {
            let span = tracing::info_span!("watch", vs_currency = %config.vs_currency);
            watch(Arc::new(source), config).instrument(span).await
        }
        Commands::Top { query } => top(&source, config, query).await,
        Commands::Details { id } => {
            let details = source.asset_details(&id).await?;
            print_out(&format_details(&details, &config.vs_currency))
        }
        Commands::Search { text } => {
            let hits = source.search(&text).await?;
            print_out(&format_hits(&hits))
        }
    }
}

async fn watch(source: Arc<dyn PriceSource>, config: &Config) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let worker = DashboardWorker::new(source, tx, config.market_query());
    let mut state = Dashboard::new(config.debounce()).with_currency(&config.vs_currency);
    let cols = terminal_cols();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    worker.dispatch(&mut state, &Event::Initialize)?;
    draw(&state, cols)?;

    loop {
        let event = tokio::select! {
            line = lines.next_line(), if stdin_open => {
                stdin_open = !matches!(line, Ok(None));
                match input_event(line)? {
                    Some(event) => event,
                    None => continue,
                }
            }
            Some(event) = rx.recv() => event,
            else => Event::Quit,
        };

        let outcome = worker.dispatch(&mut state, &event)?;
        if outcome.should_render {
            draw(&state, cols)?;
        }
        if !outcome.keep_running {
            break;
        }
    }

    tracing::debug!("watch loop finished");
    Ok(())
}

async fn top(source: &CoinGeckoSource, config: &Config, query: Option<String>) -> Result<()> {
    let mut state = Dashboard::new(Duration::ZERO).with_currency(&config.vs_currency);
    let generation = state.controller.refetch();

    let outcome = source.top_assets(&config.market_query()).await;
    let failure = outcome.as_ref().err().cloned();
    state.controller.resolve(generation, outcome);
    state.filter.on_dataset_changed(state.controller.dataset());

    if let Some(ticket) = query.and_then(|q| state.filter.set_query(q)) {
        state.filter.fire(ticket, state.controller.dataset());
    }

    print_out(&ui::render(&state, terminal_cols()))?;
    failure.map_or(Ok(()), |e| Err(e.into()))
}

/// Maps one stdin read to an event. End of input quits; a line that is not
/// valid UTF-8 is logged and skipped.
fn input_event(read: io::Result<Option<String>>) -> io::Result<Option<Event>> {
    match read {
        Ok(Some(line)) => Ok(Some(map_input_line(&line))),
        Ok(None) => Ok(Some(Event::Quit)),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            tracing::warn!(error = %e, "skipping unreadable input line");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn map_input_line(line: &str) -> Event {
    match line.trim() {
        ":q" | ":quit" => Event::Quit,
        ":r" | ":refresh" => Event::Refetch,
        _ => Event::SetQuery(line.to_string()),
    }
}

fn terminal_cols() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(80)
}

fn draw(state: &Dashboard, cols: usize) -> Result<()> {
    // Clear screen and home the cursor before each frame.
    print_out(&format!("\x1b[2J\x1b[H{}", ui::render(state, cols)))
}

fn print_out(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn format_details(details: &AssetDetails, vs_currency: &str) -> String {
    let name = details.name.as_deref().unwrap_or("?");
    let symbol = details.symbol.as_deref().unwrap_or_default().to_uppercase();
    let mut out = format!("{name} ({symbol})\n");

    if let Some(rank) = details.market_cap_rank {
        out.push_str(&format!("Rank: #{rank}\n"));
    }

    let price = |field| details.market_value(field, vs_currency);
    let amounts = [
        ("Price", price("current_price").map(|v| ui::format_price(v, vs_currency))),
        (
            "Change (24h)",
            details
                .market_figure("price_change_percentage_24h")
                .map(ui::format_change),
        ),
        ("24h High", price("high_24h").map(|v| ui::format_price(v, vs_currency))),
        ("24h Low", price("low_24h").map(|v| ui::format_price(v, vs_currency))),
        (
            "Volume (24h)",
            price("total_volume").map(|v| ui::format_large_number(v, vs_currency)),
        ),
        (
            "Market Cap",
            price("market_cap").map(|v| ui::format_large_number(v, vs_currency)),
        ),
    ];
    for (label, value) in amounts {
        if let Some(value) = value {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }

    if details.market_data.is_some() {
        for (label, field) in [
            ("Circulating Supply", "circulating_supply"),
            ("Total Supply", "total_supply"),
        ] {
            let supply = details
                .market_figure(field)
                .filter(|s| *s > 0.0)
                .map_or_else(|| "N/A".to_string(), ui::format_supply);
            out.push_str(&format!("{label}: {supply}\n"));
        }
    }

    if let Some(description) = details.description_en() {
        let summary: String = description.chars().take(400).collect();
        out.push_str(&format!("\n{summary}\n"));
    }
    out
}

fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found\n".to_string();
    }
    hits.iter()
        .map(|hit| {
            format!(
                "{:<6} {:<28} {:<8} {}\n",
                hit.market_cap_rank.map_or_else(|| "-".to_string(), |r| format!("#{r}")),
                hit.name.as_deref().unwrap_or_default(),
                hit.symbol.as_deref().unwrap_or_default().to_uppercase(),
                hit.id.as_deref().unwrap_or_default(),
            )
        })
        .collect()
}
