use std::sync::Arc;
use tokio::task;
use tokio::time::{self, Duration};
use tracing::{info, warn};

use super::config::RateQuery;
use super::error::Error;
use common::error::Error as MarketError;
use common::types::{ArbitrageReport, ConversionPath};
use fx_arb_core::ExchangeGraph;
use fx_arb_core::traits::{CycleDetector, RateFinder};

pub type SharedGraph = Arc<ExchangeGraph>;

/// Answer to one configured best-rate query.
#[derive(Debug, Clone)]
pub struct QuoteOutcome {
    pub query: RateQuery,
    pub result: Result<ConversionPath, MarketError>,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub arbitrage: ArbitrageReport,
    pub quotes: Vec<QuoteOutcome>,
    /// Set when the best-rate table was solved over a market holding an arbitrage.
    pub rates_unbounded: bool,
}

/// Runs the cycle detector and the rate finder side by side over one shared graph.
///
/// Both solvers only read the graph, so each gets its own `Arc` handle and a
/// blocking worker thread; no locking is involved.
pub struct ArbAnalyzer<D, F> {
    detector: D,
    finder: F,
    graph: SharedGraph,
    queries: Vec<RateQuery>,
    budget: Duration,
}

impl<D, F> ArbAnalyzer<D, F>
where
    D: CycleDetector + Send + 'static,
    F: RateFinder + Send + 'static,
{
    /// With no queries configured, quotes the first currency against every other.
    pub fn new(
        graph: SharedGraph,
        detector: D,
        finder: F,
        queries: Vec<RateQuery>,
        budget: Duration,
    ) -> Self {
        let queries = if queries.is_empty() {
            default_queries(&graph)
        } else {
            queries
        };

        ArbAnalyzer {
            detector,
            finder,
            graph,
            queries,
            budget,
        }
    }

    /// Runs both analyses concurrently within the configured time budget.
    ///
    /// On timeout the blocking workers are not interrupted; their results are dropped.
    pub async fn run(self) -> Result<AnalysisOutcome, Error> {
        info!(
            currencies = self.graph.currency_count(),
            queries = self.queries.len(),
            "Analyzer: starting cycle search and best-rate solve"
        );

        let detector = self.detector;
        let detector_graph = Arc::clone(&self.graph);
        let detection =
            task::spawn_blocking(move || detector.find_arbitrage_cycle(&detector_graph));

        let finder = self.finder;
        let finder_graph = Arc::clone(&self.graph);
        let queries = self.queries;
        let quoting = task::spawn_blocking(move || {
            let table = finder.solve(&finder_graph);
            let quotes: Vec<QuoteOutcome> = queries
                .into_iter()
                .map(|query| QuoteOutcome {
                    result: table.lookup(&finder_graph, &query.source, &query.target),
                    query,
                })
                .collect();
            (quotes, table.has_positive_cycle())
        });

        let (detection, quoting) = time::timeout(self.budget, async {
            tokio::join!(detection, quoting)
        })
        .await
        .map_err(|_| {
            Error::TaskFailed(format!(
                "analysis exceeded its {} ms budget",
                self.budget.as_millis()
            ))
        })?;

        let cycle = detection.map_err(|e| Error::TaskFailed(e.to_string()))??;
        let (quotes, rates_unbounded) = quoting.map_err(|e| Error::TaskFailed(e.to_string()))?;

        if rates_unbounded {
            warn!("Analyzer: market holds an arbitrage, best rates are not true optima");
        }

        Ok(AnalysisOutcome {
            arbitrage: cycle.into(),
            quotes,
            rates_unbounded,
        })
    }
}

fn default_queries(graph: &ExchangeGraph) -> Vec<RateQuery> {
    let names = graph.names();
    names
        .iter()
        .skip(1)
        .map(|target| RateQuery {
            source: names[0].clone(),
            target: target.clone(),
        })
        .collect()
}
