use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stroller_scout::config::constants::DEFAULT_KEYWORD;
use stroller_scout::config::ScrapeSettings;
use stroller_scout::engine::{control_channel, LogOnlySink, Orchestrator, RunRequest};
use stroller_scout::network::{PageClient, SourceRegistry};
use stroller_scout::ops::telemetry;
use stroller_scout::persistence::export_csv;
use tracing::{error, info, warn};

/// Scrape stroller listings from UAE online retailers into one CSV
#[derive(Parser, Debug)]
#[command(name = "stroller-scout", version, about)]
struct Cli {
    /// Specific retailer(s); defaults to every catalogued retailer
    #[arg(long, num_args = 1.., value_delimiter = ',', env = "SCOUT_RETAILERS")]
    retailers: Vec<String>,

    /// Product keyword
    #[arg(long, env = "SCOUT_KEYWORD", default_value = DEFAULT_KEYWORD)]
    keyword: String,

    /// Resume from the checkpoint in --output-dir
    #[arg(long, env = "SCOUT_RESUME")]
    resume: bool,

    /// Final CSV path
    #[arg(long, env = "SCOUT_OUTPUT", default_value = "output/uae_products.csv")]
    output: PathBuf,

    /// Run workspace (checkpoint and partial export)
    #[arg(long, env = "SCOUT_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// List retailers and exit
    #[arg(long)]
    list: bool,

    /// Accepted for compatibility; pages are fetched without a browser
    #[arg(long)]
    headful: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, env = "SCOUT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Human-readable logs instead of JSON
    #[arg(long, env = "SCOUT_PRETTY")]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.pretty {
        telemetry::init_tracing_pretty(&cli.log_level);
    } else {
        telemetry::init_tracing_with_level(&cli.log_level);
    }

    let client = match PageClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "HTTP client initialization failed");
            return ExitCode::FAILURE;
        }
    };

    let registry = match SourceRegistry::with_storefronts(client) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!(error = %e, "Retailer catalog is invalid");
            return ExitCode::FAILURE;
        }
    };

    if cli.list {
        let mut names = registry.names();
        names.sort();
        println!("\nAvailable retailers:");
        for name in &names {
            println!("  {}", name);
        }
        println!("\nTotal: {} retailers", names.len());
        return ExitCode::SUCCESS;
    }

    if cli.headful {
        warn!("--headful has no effect; pages are fetched over plain HTTP");
    }

    let sources = if cli.retailers.is_empty() {
        registry.names()
    } else {
        cli.retailers.clone()
    };

    let request = RunRequest {
        sources,
        keyword: cli.keyword.clone(),
        resume: cli.resume,
        output_dir: cli.output_dir.clone(),
    };

    let (control, mut control_rx) = control_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after the current product");
            let _ = control.stop();
        }
    });

    let orchestrator = Orchestrator::new(registry, ScrapeSettings::default());
    let report = match orchestrator.run(&request, &LogOnlySink, &mut control_rx).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Scrape aborted");
            return ExitCode::FAILURE;
        }
    };

    if report.records.is_empty() {
        println!("\nNo products were scraped.");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = export_csv(&report.records, &cli.output) {
        error!(error = %e, path = %cli.output.display(), "Final export failed");
        return ExitCode::FAILURE;
    }

    info!(
        path = %cli.output.display(),
        products = report.records.len(),
        stopped_early = report.stopped_early,
        "Export written"
    );
    println!("\nOutput saved to: {}", cli.output.display());
    println!("Total products: {}", report.records.len());

    ExitCode::SUCCESS
}
