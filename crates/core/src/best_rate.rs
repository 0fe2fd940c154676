use tracing::{debug, warn};

use super::graph::ExchangeGraph;
use super::traits::RateFinder;
use common::{error::Error, numeric_kernel::compound, types::ConversionPath};

/// Slack above 1 tolerated on the diagonal before a self-loop counts as profitable.
const NEUTRAL_SLACK: f64 = 1e-9;

/// All-pairs best compounded rates with successor pointers for path recovery.
///
/// Both buffers are row-major `n * n`:
/// - `dist[i * n + j]` -> best compounded rate found from `i` to `j`
/// - `next[i * n + j]` -> first hop on the best known path from `i` to `j`
///
/// The table is owned by the caller that solved it and never shared with the graph.
#[derive(Debug, Clone)]
pub struct RateTable {
    n: usize,
    dist: Vec<f64>,
    next: Vec<usize>,
}

impl RateTable {
    /// Table holding only the direct rates of `graph`.
    fn direct(graph: &ExchangeGraph) -> Self {
        let n = graph.currency_count();
        let mut dist = Vec::with_capacity(n * n);
        let mut next = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                dist.push(graph.rate(i, j));
                next.push(j);
            }
        }
        Self { n, dist, next }
    }

    /// Relaxes through intermediates `0..through`.
    ///
    /// A pair improves when routing via `k` multiplies out higher than the best
    /// rate known so far: `dist[i][j] < dist[i][k] * dist[k][j]`. This is the
    /// product analogue of the usual `dist[i][k] + dist[k][j]` sum.
    fn relax(&mut self, through: usize) {
        let n = self.n;
        for k in 0..through.min(n) {
            for i in 0..n {
                for j in 0..n {
                    let candidate = self.dist[i * n + k] * self.dist[k * n + j];
                    if self.dist[i * n + j] < candidate {
                        self.dist[i * n + j] = candidate;
                        self.next[i * n + j] = self.next[i * n + k];
                    }
                }
            }
        }
    }

    pub fn currency_count(&self) -> usize {
        self.n
    }

    /// Best compounded rate from `from` to `to`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn rate(&self, from: usize, to: usize) -> f64 {
        assert!(from < self.n && to < self.n, "currency index out of bounds");
        self.dist[from * self.n + to]
    }

    /// Index path from `from` to `to` following successor pointers.
    ///
    /// Returns `None` if the successor chain revisits a vertex, which can only
    /// happen when the market contains a profitable cycle.
    pub fn path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        assert!(from < self.n && to < self.n, "currency index out of bounds");

        let mut visited = vec![false; self.n];
        let mut path = vec![from];
        visited[from] = true;

        let mut current = from;
        while current != to {
            current = self.next[current * self.n + to];
            if visited[current] {
                return None;
            }
            visited[current] = true;
            path.push(current);
        }
        Some(path)
    }

    /// True when some currency converts back into itself at a rate above 1,
    /// meaning the table was solved over a market that contains an arbitrage.
    pub fn has_positive_cycle(&self) -> bool {
        (0..self.n).any(|i| self.dist[i * self.n + i] > 1.0 + NEUTRAL_SLACK)
    }

    /// Best rate and path between two currencies by identifier.
    ///
    /// Self-conversion is always the neutral rate 1 with a single-element path.
    ///
    /// Over a market with a profitable cycle the table rate can come from a walk
    /// that revisits the cycle, which the successor chain never reproduces. The
    /// reported rate is then the product along the returned path, so the pair
    /// always describes a conversion that can actually be traded.
    ///
    /// # Errors
    /// - `Error::NotFound` if either identifier is unknown to `graph`.
    /// - `Error::PathNotRecoverable` if successor pointers loop (arbitrage present).
    pub fn lookup(
        &self,
        graph: &ExchangeGraph,
        source: &str,
        target: &str,
    ) -> Result<ConversionPath, Error> {
        let from = graph.index_of(source)?;
        let to = graph.index_of(target)?;

        if from == to {
            return Ok(ConversionPath {
                rate: 1.0,
                path: vec![source.to_string()],
            });
        }

        let indices = self.path(from, to).ok_or_else(|| {
            warn!(source, target, "successor chain loops, market holds an arbitrage");
            Error::PathNotRecoverable {
                from: source.to_string(),
                to: target.to_string(),
            }
        })?;

        let rate = if self.has_positive_cycle() {
            let hops: Vec<f64> = indices.windows(2).map(|h| graph.rate(h[0], h[1])).collect();
            compound(&hops)
        } else {
            self.rate(from, to)
        };

        Ok(ConversionPath {
            rate,
            path: indices
                .into_iter()
                .map(|i| graph.name(i).to_string())
                .collect(),
        })
    }
}

/// Multiplicative Floyd-Warshall over the raw rate matrix.
///
/// The result is the fixed point after all `n` intermediates. It is the true
/// optimum only for arbitrage-free markets; with a profitable cycle present the
/// rates stay finite but some successor chains loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydWarshallFinder;

impl FloydWarshallFinder {
    /// Solves using only the first `intermediates` currencies as hops.
    ///
    /// `0` yields the direct-rate table and `currency_count()` the full solve.
    pub fn solve_through(&self, graph: &ExchangeGraph, intermediates: usize) -> RateTable {
        let mut table = RateTable::direct(graph);
        table.relax(intermediates);
        table
    }
}

impl RateFinder for FloydWarshallFinder {
    fn solve(&self, graph: &ExchangeGraph) -> RateTable {
        let table = self.solve_through(graph, graph.currency_count());
        if table.has_positive_cycle() {
            debug!("best-rate table solved over a market with a profitable cycle");
        }
        table
    }
}

/// Best compounded rate and path from `source` to `target`.
///
/// # Errors
/// - `Error::NotFound` if either identifier is absent from the graph.
/// - `Error::PathNotRecoverable` if the market holds an arbitrage that loops the path.
pub fn find_best_rate(
    graph: &ExchangeGraph,
    source: &str,
    target: &str,
) -> Result<ConversionPath, Error> {
    graph.index_of(source)?;
    graph.index_of(target)?;

    FloydWarshallFinder.solve(graph).lookup(graph, source, target)
}

/// Rate-only variant of [`find_best_rate`]. Never fails on looping paths.
///
/// Returns the raw table rate, which over a market with a profitable cycle can
/// exceed what any single recoverable path achieves.
pub fn best_rate(graph: &ExchangeGraph, source: &str, target: &str) -> Result<f64, Error> {
    let from = graph.index_of(source)?;
    let to = graph.index_of(target)?;
    if from == to {
        return Ok(1.0);
    }

    Ok(FloydWarshallFinder.solve(graph).rate(from, to))
}
