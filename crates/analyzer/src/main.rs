pub mod config;
pub mod csv_source;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sim_source;
pub mod types;

use std::env;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use csv_source::CsvMarketSource;
use error::Error;
use fx_arb_core::{BellmanFordDetector, FloydWarshallFinder};
use pipeline::ArbAnalyzer;
use sim_source::SimulatorMarketSource;
use types::{DataSource, MarketSource};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let source = parse_args();

    if let Err(e) = run(source).await {
        error!("Analyzer failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(source: DataSource) -> Result<(), Error> {
    let config = config::load_config()?;

    let market = build_source(&source, &config).load_market().await?;
    let graph = Arc::new(market.into_graph()?);
    info!(currencies = graph.currency_count(), "Exchange graph ready.");

    let analyzer = ArbAnalyzer::new(
        graph,
        BellmanFordDetector::new(config.tolerance),
        FloydWarshallFinder,
        config.analysis.queries.clone(),
        Duration::from_millis(config.analysis.timeout_ms),
    );
    let outcome = analyzer.run().await?;

    print!("{}", report::render(&outcome));
    Ok(())
}

/// Parse command-line arguments to determine data source
fn parse_args() -> DataSource {
    let args: Vec<String> = env::args().collect();
    select_source(&args).unwrap_or_else(|| usage_and_exit(program_name(&args)))
}

/// `None` when the arguments name no usable source.
fn select_source(args: &[String]) -> Option<DataSource> {
    let source = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "sim".to_string());

    match source.as_str() {
        "sim" => Some(DataSource::SIM),
        "csv" => args.get(2).map(|path| DataSource::CSV(path.clone())),
        _ => None,
    }
}

/// argv may be empty when the process is spawned without a program name.
fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("analyzer")
}

fn usage_and_exit(program: &str) -> ! {
    eprintln!(
        "Usage: {} <SIM|CSV> [path_to_csv]\n  - SIM: analyze a simulated market\n  - CSV: analyze a rate matrix read from a CSV file",
        program
    );
    std::process::exit(1);
}

fn build_source(source: &DataSource, config: &config::Config) -> Box<dyn MarketSource> {
    match source {
        DataSource::SIM => {
            info!("Using SimulatorMarketSource...");
            Box::new(SimulatorMarketSource::new(config.simulator.clone()))
        }
        DataSource::CSV(path) => {
            info!("Using CsvMarketSource...");
            Box::new(CsvMarketSource::new(path.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_argv_falls_back_to_defaults() {
        let empty: Vec<String> = Vec::new();

        assert_eq!(program_name(&empty), "analyzer");
        assert_eq!(select_source(&empty), Some(DataSource::SIM));
    }

    #[test]
    fn test_program_name_comes_from_argv() {
        assert_eq!(program_name(&args(&["./target/analyzer", "sim"])), "./target/analyzer");
    }

    #[test]
    fn test_select_source_reads_mode_and_path() {
        assert_eq!(select_source(&args(&["analyzer"])), Some(DataSource::SIM));
        assert_eq!(select_source(&args(&["analyzer", "SIM"])), Some(DataSource::SIM));
        assert_eq!(
            select_source(&args(&["analyzer", "csv", "rates.csv"])),
            Some(DataSource::CSV("rates.csv".to_string()))
        );
    }

    #[test]
    fn test_select_source_rejects_incomplete_or_unknown_mode() {
        assert_eq!(select_source(&args(&["analyzer", "csv"])), None);
        assert_eq!(select_source(&args(&["analyzer", "stream"])), None);
    }
}
