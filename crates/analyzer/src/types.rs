use super::error::Error;
use fx_arb_core::ExchangeGraph;

/// Where the analyzer reads its rate matrix from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    SIM,
    CSV(String),
}

/// Raw, not yet validated rate matrix as delivered by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub names: Vec<String>,
    pub rates: Vec<Vec<f64>>,
}

impl Market {
    /// Validates the matrix into an immutable exchange graph.
    pub fn into_graph(self) -> Result<ExchangeGraph, Error> {
        Ok(ExchangeGraph::new(&self.names, &self.rates)?)
    }
}

/// A trait defining the contract for any source that supplies a market snapshot
/// to the analysis pipeline.
///
/// This decouples the pipeline from the specific data source (CSV file vs.
/// simulated market). The bounds let the source be driven from a Tokio task.
#[async_trait::async_trait]
pub trait MarketSource: Send + Sync + 'static {
    async fn load_market(&self) -> Result<Market, Error>;
}
