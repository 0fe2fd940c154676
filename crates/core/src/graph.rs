use std::collections::HashMap;

use common::error::Error;
use common::numeric_kernel::neg_log10;

/// Dense, immutable currency exchange graph.
///
/// Rates are stored row-major in a single contiguous buffer:
/// - `rates[i * n + j]` -> units of currency `j` received for one unit of currency `i`
/// - `index_by_name[name]` -> position of `name` in `names`
///
/// Every pair of currencies has a direct rate, so the graph is complete and every
/// vertex is reachable from every other. The derived log-weight graph
/// (`-log10(rate)`) is computed on demand and never stored.
#[derive(Debug, Clone)]
pub struct ExchangeGraph {
    names: Vec<String>,
    rates: Vec<f64>,
    index_by_name: HashMap<String, usize>,
}

impl ExchangeGraph {
    /// Builds a graph from currency names and a square rate matrix.
    ///
    /// # Errors
    /// - `Error::EmptyGraph` if there are no currencies.
    /// - `Error::DimensionMismatch` if the matrix row count differs from `names.len()`.
    /// - `Error::NonSquareRow` if any row has the wrong number of columns.
    /// - `Error::InvalidRate` for a zero, negative or non-finite rate.
    /// - `Error::NonNeutralDiagonal` if a self-conversion rate is not 1.
    /// - `Error::DuplicateCurrency` if a name appears twice.
    pub fn new<S, R>(names: &[S], rates: &[R]) -> Result<Self, Error>
    where
        S: AsRef<str>,
        R: AsRef<[f64]>,
    {
        let n = names.len();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        if rates.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                actual: rates.len(),
            });
        }

        let mut flat = Vec::with_capacity(n * n);
        for (row, values) in rates.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n {
                return Err(Error::NonSquareRow {
                    row,
                    expected: n,
                    actual: values.len(),
                });
            }

            for (col, &rate) in values.iter().enumerate() {
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(Error::InvalidRate { row, col, rate });
                }
                if row == col && rate != 1.0 {
                    return Err(Error::NonNeutralDiagonal { index: row, rate });
                }
                flat.push(rate);
            }
        }

        let mut index_by_name = HashMap::with_capacity(n);
        for (idx, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if index_by_name.insert(name.to_string(), idx).is_some() {
                return Err(Error::DuplicateCurrency(name.to_string()));
            }
        }

        Ok(Self {
            names: names.iter().map(|s| s.as_ref().to_string()).collect(),
            rates: flat,
            index_by_name,
        })
    }

    /// Same as [`ExchangeGraph::new`], with an explicit currency count that both
    /// `names` and `rates` must agree with.
    pub fn with_count<S, R>(
        currency_count: usize,
        names: &[S],
        rates: &[R],
    ) -> Result<Self, Error>
    where
        S: AsRef<str>,
        R: AsRef<[f64]>,
    {
        if currency_count == 0 {
            return Err(Error::EmptyGraph);
        }
        if names.len() != currency_count {
            return Err(Error::DimensionMismatch {
                expected: currency_count,
                actual: names.len(),
            });
        }
        Self::new(names, rates)
    }

    pub fn currency_count(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the currency at `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= currency_count()`.
    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Direct conversion rate from `from` to `to`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn rate(&self, from: usize, to: usize) -> f64 {
        let n = self.currency_count();
        assert!(from < n && to < n, "currency index out of bounds");
        self.rates[from * n + to]
    }

    /// Edge weight in the log-transformed graph: `-log10(rate(from, to))`.
    #[inline]
    pub fn log_weight(&self, from: usize, to: usize) -> f64 {
        neg_log10(self.rate(from, to))
    }

    /// Materializes the full log-weight matrix (row-major, `n * n`) as a fresh buffer.
    pub fn log_weights(&self) -> Vec<f64> {
        self.rates.iter().map(|&r| neg_log10(r)).collect()
    }

    /// O(1) lookup of a currency identifier.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the identifier is not part of the graph.
    pub fn index_of(&self, name: &str) -> Result<usize, Error> {
        self.index_by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Direct conversion rate between two currencies by identifier.
    pub fn rate_between(&self, from: &str, to: &str) -> Result<f64, Error> {
        Ok(self.rate(self.index_of(from)?, self.index_of(to)?))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const ABC: [&str; 3] = ["A", "B", "C"];

    pub const ABC_RATES: [[f64; 3]; 3] = [
        [1.0, 0.651, 0.581],
        [1.531, 1.0, 0.952],
        [1.711, 1.049, 1.0],
    ];
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn new_builds_dense_graph() {
        let graph = ExchangeGraph::new(&ABC, &ABC_RATES).unwrap();

        assert_eq!(graph.currency_count(), 3);
        assert_eq!(graph.names(), &["A", "B", "C"]);
        assert_eq!(graph.name(2), "C");
        assert_eq!(graph.rate(1, 2), 0.952);
        assert_eq!(graph.rate(2, 2), 1.0);
    }

    #[test]
    fn log_weight_is_negative_log10_of_rate() {
        let graph = ExchangeGraph::new(&ABC, &ABC_RATES).unwrap();
        let weights = graph.log_weights();

        for i in 0..3 {
            for j in 0..3 {
                let expected = -ABC_RATES[i][j].log10();
                assert!((graph.log_weight(i, j) - expected).abs() < 1e-12);
                assert_eq!(weights[i * 3 + j], graph.log_weight(i, j));
            }
        }
        assert_eq!(graph.log_weight(0, 0), 0.0);
    }

    #[test]
    fn index_of_resolves_names() {
        let graph = ExchangeGraph::new(&ABC, &ABC_RATES).unwrap();

        assert_eq!(graph.index_of("B"), Ok(1));
        assert_eq!(graph.index_of("Z"), Err(Error::NotFound("Z".into())));
        assert_eq!(graph.rate_between("C", "A"), Ok(1.711));
    }

    #[test]
    fn single_currency_graph() {
        let graph = ExchangeGraph::new(&["USD"], &[[1.0]]).unwrap();
        assert_eq!(graph.currency_count(), 1);
        assert_eq!(graph.log_weight(0, 0), 0.0);
    }

    #[test]
    fn empty_graph_is_rejected() {
        let names: [&str; 0] = [];
        let rates: [[f64; 0]; 0] = [];
        assert_eq!(ExchangeGraph::new(&names, &rates).unwrap_err(), Error::EmptyGraph);
    }

    #[test]
    fn row_count_must_match_names() {
        let err = ExchangeGraph::new(&ABC, &ABC_RATES[..2]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let rates = vec![vec![1.0, 2.0], vec![0.5]];
        let err = ExchangeGraph::new(&["A", "B"], &rates).unwrap_err();
        assert_eq!(
            err,
            Error::NonSquareRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn non_positive_and_non_finite_rates_are_rejected() {
        for bad in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let rates = [[1.0, bad], [0.5, 1.0]];
            let err = ExchangeGraph::new(&["A", "B"], &rates).unwrap_err();
            assert!(
                matches!(err, Error::InvalidRate { row: 0, col: 1, .. }),
                "unexpected error for rate {}: {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn diagonal_must_be_neutral() {
        let rates = [[1.0, 2.0], [0.5, 1.1]];
        let err = ExchangeGraph::new(&["A", "B"], &rates).unwrap_err();
        assert_eq!(err, Error::NonNeutralDiagonal { index: 1, rate: 1.1 });
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ExchangeGraph::new(&["A", "B", "A"], &ABC_RATES).unwrap_err();
        assert_eq!(err, Error::DuplicateCurrency("A".into()));
        assert!(err.is_validation());
    }

    #[test]
    fn with_count_checks_declared_size() {
        assert!(ExchangeGraph::with_count(3, &ABC, &ABC_RATES).is_ok());

        let err = ExchangeGraph::with_count(4, &ABC, &ABC_RATES).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            ExchangeGraph::with_count(0, &ABC, &ABC_RATES).unwrap_err(),
            Error::EmptyGraph
        );
    }

    #[test]
    fn graph_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExchangeGraph>();
    }
}
