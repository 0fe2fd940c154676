use crate::numeric_kernel::rate_from_log_weight;

/// A profitable cycle of conversions in the exchange graph.
///
/// `currencies` and `indices` describe the same closed walk: the first and last
/// entries are identical and the cycle has at least one hop.
///
/// Fields:
/// - `currencies`: Currency identifiers in conversion order, anchor to anchor.
/// - `indices`: Graph indices matching `currencies`.
/// - `rates`: Rate of each hop, `rates[i]` converts `indices[i]` into `indices[i + 1]`.
/// - `log_weight_sum`: Sum of `-log10(rate)` over the hops; negative for an arbitrage.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageCycle {
    pub currencies: Vec<String>,
    pub indices: Vec<usize>,
    pub rates: Vec<f64>,
    pub log_weight_sum: f64,
}

impl ArbitrageCycle {
    /// Returns the compounded multiplier (∏ rate_i) of one trip around the cycle.
    ///
    /// Recovered from the stored log sum: `10^(-log_weight_sum)`.
    ///
    /// ```text
    /// rates [0.651, 0.952, 1.711] -> log_weight_sum ≈ -0.02547 -> product ≈ 1.0604
    /// ```
    pub fn product_rate(&self) -> f64 {
        rate_from_log_weight(self.log_weight_sum)
    }

    /// Returns true if the cycle is profitable (product_rate > 1.0).
    pub fn is_profitable(&self) -> bool {
        self.product_rate() > 1.0
    }

    pub fn hop_count(&self) -> usize {
        self.rates.len()
    }
}

/// Outcome of an arbitrage scan. `cycle` is present iff `found`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageReport {
    pub found: bool,
    pub cycle: Option<ArbitrageCycle>,
}

impl ArbitrageReport {
    pub fn none() -> Self {
        Self {
            found: false,
            cycle: None,
        }
    }

    pub fn with_cycle(cycle: ArbitrageCycle) -> Self {
        Self {
            found: true,
            cycle: Some(cycle),
        }
    }
}

impl From<Option<ArbitrageCycle>> for ArbitrageReport {
    fn from(cycle: Option<ArbitrageCycle>) -> Self {
        match cycle {
            Some(cycle) => Self::with_cycle(cycle),
            None => Self::none(),
        }
    }
}

/// Best compounded conversion from `path[0]` to the last entry of `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPath {
    pub rate: f64,
    pub path: Vec<String>,
}

impl ConversionPath {
    /// A conversion is only worth reporting when it beats a no-op.
    pub fn is_profitable(&self) -> bool {
        self.rate > 1.0
    }

    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn source(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn target(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}
