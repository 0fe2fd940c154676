use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::{Market, MarketSource};

const BPS: f64 = 10_000.0;

const ISO_CODES: [&str; 12] = [
    "USD", "EUR", "JPY", "GBP", "AUD", "CAD", "CHF", "HKD", "NZD", "SEK", "NOK", "SGD",
];

/// Produces a synthetic market snapshot.
///
/// Every currency gets a random USD price and each quote is
/// `price[i] / price[j]` minus a flat fee, so the market is arbitrage-free
/// unless `inject_arbitrage_bps` marks up one random leg.
pub struct SimulatorMarketSource {
    config: SimulatorConfig,
}

impl SimulatorMarketSource {
    pub fn new(config: SimulatorConfig) -> Self {
        SimulatorMarketSource { config }
    }

    fn currency_name(idx: usize) -> String {
        ISO_CODES
            .get(idx)
            .map(|code| code.to_string())
            .unwrap_or_else(|| format!("X{:02}", idx))
    }

    fn generate(&self) -> Market {
        let mut rng: SmallRng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let n = self.config.currencies;
        let names: Vec<String> = (0..n).map(Self::currency_name).collect();

        let price_range = self.config.min_price..=self.config.max_price;
        let prices: Vec<f64> = (0..n)
            .map(|_| rng.random_range(price_range.clone()))
            .collect();

        let fee = 1.0 - self.config.fee_bps / BPS;
        let mut rates: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 1.0 } else { prices[i] / prices[j] * fee })
                    .collect()
            })
            .collect();

        if let Some(bps) = self.config.inject_arbitrage_bps {
            if n >= 2 {
                let from = rng.random_range(0..n);
                let to = (from + rng.random_range(1..n)) % n;
                rates[from][to] *= 1.0 + bps / BPS;
                info!(
                    from = %names[from],
                    to = %names[to],
                    bps,
                    "Simulator: mispriced one leg"
                );
            }
        }

        Market { names, rates }
    }
}

#[async_trait]
impl MarketSource for SimulatorMarketSource {
    async fn load_market(&self) -> Result<Market, Error> {
        let market = self.generate();
        info!(
            currencies = market.names.len(),
            "SimulatorMarketSource: generated rate matrix"
        );
        Ok(market)
    }
}
