use std::collections::HashSet;

use tracing::{debug, error, trace};

use super::graph::ExchangeGraph;
use super::traits::CycleDetector;
use common::{
    error::Error,
    numeric_kernel::Tolerance,
    types::{ArbitrageCycle, ArbitrageReport},
};

/// Vertex the single-source search starts from. The graph is complete, so any
/// vertex reaches every negative cycle.
const SOURCE: usize = 0;

/// Detector running single-source Bellman-Ford over the `-log10(rate)` graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFordDetector {
    tolerance: Tolerance,
}

impl BellmanFordDetector {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Reconstructs the negative cycle that the certification pass flagged.
    ///
    /// The certified vertex is not necessarily on the cycle itself; it may sit
    /// downstream of it. Predecessors are followed until a vertex repeats, which
    /// happens within `n + 1` steps. The repeated vertex is the anchor: the cycle
    /// is collected by walking predecessors from the anchor back to itself, then
    /// reversed into conversion order and closed with the anchor.
    ///
    /// # Errors
    /// Returns `Error::CycleReconstructionFailed` if the predecessor chain breaks
    /// before a vertex repeats.
    pub fn reconstruct_cycle(
        &self,
        start: usize,
        pred: &[Option<usize>],
        graph: &ExchangeGraph,
    ) -> Result<ArbitrageCycle, Error> {
        let n = graph.currency_count();
        if start >= n || pred.len() != n {
            return Err(Error::CycleReconstructionFailed);
        }

        let mut visited = HashSet::with_capacity(n);
        let mut current = start;
        while visited.insert(current) {
            current = pred[current].ok_or(Error::CycleReconstructionFailed)?;
        }

        let anchor = current;
        let mut indices = Vec::with_capacity(n + 1);
        loop {
            indices.push(current);
            current = pred[current].ok_or(Error::CycleReconstructionFailed)?;
            if current == anchor {
                break;
            }
        }
        indices.push(anchor);
        indices.reverse();

        let mut rates = Vec::with_capacity(indices.len() - 1);
        let mut log_weight_sum = 0.0f64;
        for hop in indices.windows(2) {
            rates.push(graph.rate(hop[0], hop[1]));
            log_weight_sum += graph.log_weight(hop[0], hop[1]);
        }

        Ok(ArbitrageCycle {
            currencies: indices.iter().map(|&i| graph.name(i).to_string()).collect(),
            indices,
            rates,
            log_weight_sum,
        })
    }
}

impl CycleDetector for BellmanFordDetector {
    /// Runs Bellman-Ford from vertex 0 and extracts one witnessing cycle.
    ///
    /// - `n - 1` relaxation passes gated by `relax_epsilon`; a quiet pass stops early.
    /// - One certification pass gated by the looser `detect_epsilon`. The first edge
    ///   that still improves certifies a negative cycle reachable through its source.
    ///
    /// # Returns
    /// - `Ok(Some(cycle))` → Profitable cycle found.
    /// - `Ok(None)` → No negative cycle beyond tolerance.
    /// - `Err(e)` → Cycle reconstruction failed.
    fn find_arbitrage_cycle(
        &self,
        graph: &ExchangeGraph,
    ) -> Result<Option<ArbitrageCycle>, Error> {
        let n = graph.currency_count();
        let weights = graph.log_weights();
        let relax_eps = self.tolerance.relax_epsilon();
        let detect_eps = self.tolerance.detect_epsilon();

        let mut distance = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<usize>> = vec![None; n];
        distance[SOURCE] = 0.0;

        for pass in 0..n.saturating_sub(1) {
            let mut updated = false;

            for u in 0..n {
                if !distance[u].is_finite() {
                    continue;
                }
                let row = &weights[u * n..(u + 1) * n];
                for (v, &weight) in row.iter().enumerate() {
                    let candidate = distance[u] + weight;
                    if candidate < distance[v] - relax_eps {
                        distance[v] = candidate;
                        pred[v] = Some(u);
                        updated = true;
                    }
                }
            }

            trace!(pass, updated, "bellman-ford relaxation pass");
            if !updated {
                break;
            }
        }

        for u in 0..n {
            if !distance[u].is_finite() {
                continue;
            }
            let row = &weights[u * n..(u + 1) * n];
            for (v, &weight) in row.iter().enumerate() {
                if distance[u] + weight < distance[v] - detect_eps {
                    pred[v] = Some(u);
                    let cycle = self.reconstruct_cycle(v, &pred, graph)?;
                    debug!(
                        cycle = ?cycle.currencies,
                        product = cycle.product_rate(),
                        "negative cycle certified"
                    );
                    return Ok(Some(cycle));
                }
            }
        }

        debug!(currencies = n, "no negative cycle beyond tolerance");
        Ok(None)
    }
}

/// Scans `graph` for an arbitrage using the default [`Tolerance`].
pub fn detect_arbitrage(graph: &ExchangeGraph) -> ArbitrageReport {
    detect_arbitrage_with(graph, Tolerance::default())
}

/// Scans `graph` for an arbitrage with explicit tolerances.
///
/// A failed cycle reconstruction is logged and reported as "no arbitrage"; it
/// cannot occur on a validated, complete graph.
pub fn detect_arbitrage_with(graph: &ExchangeGraph, tolerance: Tolerance) -> ArbitrageReport {
    match BellmanFordDetector::new(tolerance).find_arbitrage_cycle(graph) {
        Ok(cycle) => cycle.into(),
        Err(e) => {
            error!("Arbitrage scan failed: {}", e);
            ArbitrageReport::none()
        }
    }
}
