use std::fmt::Write;

use super::pipeline::{AnalysisOutcome, QuoteOutcome};

const ARROW: &str = " -> ";

/// Renders an analysis outcome as console text.
pub fn render(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();

    match &outcome.arbitrage.cycle {
        Some(cycle) => {
            let _ = writeln!(
                out,
                "arbitrage opportunity detected: {} (x{:.6})",
                cycle.currencies.join(ARROW),
                cycle.product_rate()
            );
        }
        None => out.push_str("no arbitrage opportunity detected.\n"),
    }

    if outcome.rates_unbounded {
        out.push_str("note: market holds an arbitrage, quoted rates are for the listed paths.\n");
    }

    for quote in &outcome.quotes {
        out.push_str(&render_quote(quote));
        out.push('\n');
    }

    out
}

fn render_quote(quote: &QuoteOutcome) -> String {
    let QuoteOutcome { query, result } = quote;
    match result {
        Ok(best) if best.is_profitable() => format!(
            "best conversion rate from {} to {} is {:.6} via {}",
            query.source,
            query.target,
            best.rate,
            best.path.join(ARROW)
        ),
        Ok(best) => format!(
            "no profitable conversion from {} to {} (best rate {:.6} via {})",
            query.source,
            query.target,
            best.rate,
            best.path.join(ARROW)
        ),
        Err(e) => format!("{}{}{}: {}", query.source, ARROW, query.target, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateQuery;
    use common::error::Error as MarketError;
    use common::types::{ArbitrageCycle, ArbitrageReport, ConversionPath};

    fn query(source: &str, target: &str) -> RateQuery {
        RateQuery {
            source: source.into(),
            target: target.into(),
        }
    }

    #[test]
    fn renders_cycle_and_quotes() {
        let cycle = ArbitrageCycle {
            currencies: vec!["A".into(), "B".into(), "C".into(), "A".into()],
            indices: vec![0, 1, 2, 0],
            rates: vec![0.651, 0.952, 1.711],
            log_weight_sum: -(1.060395672f64.log10()),
        };
        let outcome = AnalysisOutcome {
            arbitrage: ArbitrageReport::with_cycle(cycle),
            quotes: vec![
                QuoteOutcome {
                    query: query("C", "A"),
                    result: Ok(ConversionPath {
                        rate: 1.711,
                        path: vec!["C".into(), "A".into()],
                    }),
                },
                QuoteOutcome {
                    query: query("A", "C"),
                    result: Ok(ConversionPath {
                        rate: 0.657,
                        path: vec!["A".into(), "B".into(), "C".into()],
                    }),
                },
                QuoteOutcome {
                    query: query("A", "Z"),
                    result: Err(MarketError::NotFound("Z".into())),
                },
            ],
            rates_unbounded: true,
        };

        let text = render(&outcome);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "arbitrage opportunity detected: A -> B -> C -> A (x1.060396)"
        );
        assert!(lines[1].starts_with("note:"));
        assert_eq!(
            lines[2],
            "best conversion rate from C to A is 1.711000 via C -> A"
        );
        assert_eq!(
            lines[3],
            "no profitable conversion from A to C (best rate 0.657000 via A -> B -> C)"
        );
        assert_eq!(lines[4], "A -> Z: Currency not found: Z.");
    }

    #[test]
    fn renders_absence_of_arbitrage() {
        let outcome = AnalysisOutcome {
            arbitrage: ArbitrageReport::none(),
            quotes: Vec::new(),
            rates_unbounded: false,
        };

        assert_eq!(render(&outcome), "no arbitrage opportunity detected.\n");
    }
}
