use super::best_rate::RateTable;
use super::graph::ExchangeGraph;
use common::{error::Error, types::ArbitrageCycle};

/// Trait for solvers capable of detecting profitable conversion cycles.
pub trait CycleDetector {
    /// Detects a negative cycle in the log-weight graph.
    ///
    /// Returns `Ok(Some(cycle))` if an arbitrage is found,
    /// `Ok(None)` if none exists, or `Err(e)` on failure.
    fn find_arbitrage_cycle(
        &self,
        graph: &ExchangeGraph,
    ) -> Result<Option<ArbitrageCycle>, Error>;
}

/// Trait for solvers computing best compounded rates between all currency pairs.
pub trait RateFinder {
    /// Produces the all-pairs table of best rates and successor pointers.
    fn solve(&self, graph: &ExchangeGraph) -> RateTable;
}
