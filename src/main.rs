use anyhow::Result;
use chrono::Datelike;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use polistats::api::WorldBankClient;
use polistats::compare::{ComparisonOutcome, Registry};
use polistats::models::{Config, Indicator, ReconciledRecord, YearRange};
use polistats::pipeline::{Pipeline, PipelineConfig};
use polistats::ui;

/// Compare leaders' tenure-boundary economic conditions
#[derive(Parser)]
#[command(name = "polistats")]
#[command(version)]
#[command(about = "Merge head-of-state tenure records with World Bank indicators and compare two leaders side by side")]
struct Args {
    /// Tab-separated tenure file (PLAD-style columns), overrides TENURE_PATH
    #[arg(long, short = 'i')]
    input: Option<String>,

    /// ISO country codes to fetch indicators for, comma separated
    #[arg(long, short = 'c', default_value = "AFG", value_delimiter = ',')]
    countries: Vec<String>,

    /// First year of the indicator query range
    #[arg(long, default_value_t = 1948)]
    start_year: i32,

    /// Last year of the indicator query range (defaults to the current year)
    #[arg(long)]
    end_year: Option<i32>,

    /// Print the reconciled table and exit instead of starting the dashboard
    #[arg(long)]
    no_ui: bool,

    /// Skip the pipeline and use the built-in demo registry
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Suppress most logs while the TUI owns the terminal.
    let default_filter = if args.no_ui {
        "polistats=info"
    } else {
        "polistats=error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    let registry = if args.demo {
        Registry::demo()
    } else {
        let provider = WorldBankClient::new(&config)?;
        let end_year = args.end_year.unwrap_or_else(|| chrono::Utc::now().year());
        let pipeline_config = PipelineConfig {
            tenure_path: args.input.clone().unwrap_or_else(|| config.tenure_path.clone()),
            countries: args.countries.clone(),
            years: YearRange::new(args.start_year, end_year),
            indicators: Indicator::defaults(),
        };

        let pipeline = Pipeline::new(provider, pipeline_config);
        match pipeline.run().await {
            Ok(records) => {
                if args.no_ui {
                    print_reconciled(&records);
                    return Ok(());
                }
                Registry::from_reconciled(&records)
            }
            Err(e) => {
                error!("Pipeline failed: {}", e);
                eprintln!("❌ Pipeline Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    if args.no_ui {
        // Demo data with no terminal to select in: show the default pairing.
        print_comparison(&registry.compare(&["Obama", "Trump"]));
        return Ok(());
    }

    ui::run_app(registry)?;
    println!("Thanks for using Polistats!");
    Ok(())
}

fn print_reconciled(records: &[ReconciledRecord]) {
    println!("📊 {} reconciled rows", records.len());
    for record in records {
        let values: Vec<String> = record
            .values
            .iter()
            .map(|(label, value)| match value {
                Some(v) => format!("{}: {:.2}", label, v),
                None => format!("{}: -", label),
            })
            .collect();
        println!(
            "{}  {}  {}..{}  @{}  {}",
            record.country,
            record.leader,
            record.start_year,
            record.end_year,
            record.year,
            values.join("  ")
        );
    }
}

fn print_comparison(outcome: &ComparisonOutcome) {
    match outcome {
        ComparisonOutcome::Table(table) => {
            println!("### Comparison between {} and {}", table.left, table.right);
            println!("{:<24} {:>12} {:>12}", "Metric", table.left, table.right);
            for row in &table.rows {
                println!("{:<24} {:>12.1} {:>12.1}", row.metric, row.left, row.right);
            }
        }
        other => {
            if let Some(message) = other.message() {
                println!("{}", message);
            }
        }
    }
}
