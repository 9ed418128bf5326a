// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};

use tokenomics::config::{ENV_CHARTS_DIR, ENV_DATA_PATH};
use tokenomics::histogram::save_histogram;
use tokenomics::{ColorPolicy, Config, Dashboard, Report, SupplyKind, TokenStore};

#[derive(Parser)]
#[command(name = "tokenomics")]
#[command(about = "Tokenomics of the top ERC-20 tokens, by taxonomy and supply", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Token dataset (.json or .csv)
    #[arg(long, global = true, env = ENV_DATA_PATH)]
    data: Option<PathBuf>,

    /// Directory with precomputed supply chart files
    #[arg(long, global = true, env = ENV_CHARTS_DIR)]
    charts: Option<PathBuf>,

    /// Color segments by category instead of by rank
    #[arg(long, global = true)]
    by_category: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal dashboard (default)
    Dashboard,

    /// Category counts and percentages per taxonomy
    Summary {
        /// Only this taxonomy (e.g. class, incentive, governance)
        #[arg(long)]
        taxonomy: Option<String>,

        /// List member tokens under each category
        #[arg(long)]
        members: bool,

        #[arg(long)]
        json: bool,
    },

    /// Supply histogram bins with their tooltip text
    Bins {
        /// total | max | circulating
        #[arg(long)]
        supply: SupplyKind,

        #[arg(long)]
        json: bool,
    },

    /// Recompute the three supply chart files from the dataset
    BuildBins {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let policy = if cli.by_category {
        ColorPolicy::ByCategory
    } else {
        ColorPolicy::Positional
    };
    let config = Config::resolve(cli.data, cli.charts).with_color_policy(policy);
    debug!("Resolved config: {:?}", config);

    if !config.data_exists() {
        eprintln!("❌ Dataset not found: {}", config.data_path.display());
        eprintln!("   Pass --data PATH or set {}", ENV_DATA_PATH);
        std::process::exit(1);
    }

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => run_ui_mode(&config)?,
        Commands::Summary {
            taxonomy,
            members,
            json,
        } => run_summary(&config, taxonomy.as_deref(), members, json)?,
        Commands::Bins { supply, json } => run_bins(&config, supply, json)?,
        Commands::BuildBins { out } => run_build_bins(&config, &out)?,
    }

    Ok(())
}

fn load_dashboard(config: &Config) -> Result<Dashboard> {
    Dashboard::load(config)
        .with_context(|| format!("Failed to load dashboard from {}", config.data_path.display()))
}

fn run_summary(config: &Config, key: Option<&str>, members: bool, json: bool) -> Result<()> {
    let dashboard = load_dashboard(config)?;

    let bars = match key {
        Some(key) => {
            let taxonomy = dashboard.taxonomy(key).with_context(|| {
                format!(
                    "Unknown taxonomy '{}' (available: {})",
                    key,
                    dashboard.taxonomy_keys().join(", ")
                )
            })?;
            vec![dashboard.bar(taxonomy)]
        }
        None => dashboard.bars(),
    };

    let report = Report::new(dashboard.store().len()).with_bars(bars);
    print_report(&report, members, json)
}

fn run_bins(config: &Config, kind: SupplyKind, json: bool) -> Result<()> {
    let dashboard = load_dashboard(config)?;

    let report =
        Report::new(dashboard.store().len()).with_supply(kind, dashboard.bins(kind));
    print_report(&report, true, json)
}

fn print_report(report: &Report, members: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        println!("{}", report.to_text(members));
    }
    Ok(())
}

fn run_build_bins(config: &Config, out: &Path) -> Result<()> {
    println!("📊 Building supply charts from {}", config.data_path.display());

    let store = TokenStore::load(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;
    println!("✓ Loaded {} tokens", store.len());

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    // Built fresh from the tokens, never from existing chart files
    let dashboard = Dashboard::new(store, config.color_policy);

    for kind in SupplyKind::all() {
        let Some(data) = dashboard.chart(kind) else {
            continue;
        };

        let path = out.join(kind.chart_file());
        save_histogram(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} bins to {:?}", data.bin_counts.len(), path);
        println!("✓ {} → {}", kind.title(), path.display());
    }

    println!("\n✅ Supply charts written");

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    println!("🖥️  Loading Tokenomics Dashboard...\n");

    let dashboard = load_dashboard(config)?;
    println!("✓ Loaded {} tokens\n", dashboard.store().len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(&dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: tokenomics summary");
    std::process::exit(1);
}
