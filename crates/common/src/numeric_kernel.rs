use serde::Deserialize;

use crate::error::Error;

/// Epsilon used while relaxing edges inside the main Bellman-Ford loop.
pub const DEFAULT_RELAX_EPSILON: f64 = 1e-9;

/// Epsilon used by the extra pass that certifies a negative cycle.
pub const DEFAULT_DETECT_EPSILON: f64 = 1e-7;

/// Floating-point tolerances for negative-cycle detection.
///
/// Two gates are needed:
/// - `relax_epsilon` suppresses updates caused by rounding noise when a round trip
///   multiplies out to almost exactly 1. Too large and tiny real cycles are missed.
/// - `detect_epsilon` is the margin an edge must still improve by after `n - 1`
///   passes before a cycle is declared. It absorbs error accumulated over those
///   passes and must be strictly larger than `relax_epsilon`.
///
/// Both are in log10 units, so `detect_epsilon = 1e-7` corresponds to a compounded
/// round trip of roughly `1 + 2.3e-7`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawTolerance")]
pub struct Tolerance {
    relax_epsilon: f64,
    detect_epsilon: f64,
}

#[derive(Deserialize)]
struct RawTolerance {
    relax_epsilon: f64,
    detect_epsilon: f64,
}

impl TryFrom<RawTolerance> for Tolerance {
    type Error = Error;

    fn try_from(raw: RawTolerance) -> Result<Self, Self::Error> {
        Tolerance::new(raw.relax_epsilon, raw.detect_epsilon)
    }
}

impl Tolerance {
    pub fn new(relax_epsilon: f64, detect_epsilon: f64) -> Result<Self, Error> {
        let valid = relax_epsilon.is_finite()
            && detect_epsilon.is_finite()
            && relax_epsilon >= 0.0
            && detect_epsilon > relax_epsilon;

        if !valid {
            return Err(Error::InvalidTolerance {
                relax: relax_epsilon,
                detect: detect_epsilon,
            });
        }

        Ok(Self {
            relax_epsilon,
            detect_epsilon,
        })
    }

    pub fn relax_epsilon(&self) -> f64 {
        self.relax_epsilon
    }

    pub fn detect_epsilon(&self) -> f64 {
        self.detect_epsilon
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relax_epsilon: DEFAULT_RELAX_EPSILON,
            detect_epsilon: DEFAULT_DETECT_EPSILON,
        }
    }
}

/// Log-weight of a conversion: `-log10(rate)`. Rates above 1 map to negative weights.
#[inline]
pub fn neg_log10(rate: f64) -> f64 {
    -rate.log10()
}

/// Inverse of [`neg_log10`].
#[inline]
pub fn rate_from_log_weight(weight: f64) -> f64 {
    10f64.powf(-weight)
}

/// Compounded rate of a sequence of conversions.
///
/// The product is taken as a sum in log space, which keeps long chains of
/// near-1 rates from drifting the way a running product does.
pub fn compound(rates: &[f64]) -> f64 {
    let log_sum: f64 = rates.iter().map(|&r| neg_log10(r)).sum();
    rate_from_log_weight(log_sum)
}
