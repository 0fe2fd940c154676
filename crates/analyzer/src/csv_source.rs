use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use tracing::{error, info};

use super::error::Error;
use super::types::{Market, MarketSource};

/// Reads a square rate matrix from a CSV file.
///
/// ```text
/// currency,USD,EUR,JPY
/// USD,1,0.85,110.0
/// EUR,1.176,1,129.53
/// JPY,0.0091,0.0077,1
/// ```
///
/// Row labels must repeat the header's currency order.
pub struct CsvMarketSource {
    path: String,
}

impl CsvMarketSource {
    pub fn new(path: String) -> Self {
        CsvMarketSource { path }
    }

    fn parse_csv_to_market(&self) -> Result<Market, Error> {
        let file = File::open(&self.path).map_err(|e| {
            error!("Failed to read file {}: {:?}", self.path, e);
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let names: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_string).collect();
        if names.is_empty() {
            return Err(Error::MalformedMatrix(
                "header must list at least one currency".to_string(),
            ));
        }

        let mut rates = Vec::with_capacity(names.len());
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let label = record.get(0).unwrap_or_default();
            let expected = names.get(row).ok_or_else(|| {
                Error::MalformedMatrix(format!("unexpected extra row '{}'", label))
            })?;
            if label != expected.as_str() {
                return Err(Error::MalformedMatrix(format!(
                    "row {} is labelled '{}', expected '{}'",
                    row, label, expected
                )));
            }
            rates.push(parse_rates(row, &record)?);
        }

        Ok(Market { names, rates })
    }
}

fn parse_rates(row: usize, record: &StringRecord) -> Result<Vec<f64>, Error> {
    record
        .iter()
        .skip(1)
        .enumerate()
        .map(|(col, field)| {
            field.parse::<f64>().map_err(|e| {
                Error::MalformedMatrix(format!(
                    "rate at ({}, {}) is not a number '{}': {}",
                    row, col, field, e
                ))
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl MarketSource for CsvMarketSource {
    async fn load_market(&self) -> Result<Market, Error> {
        let market = self.parse_csv_to_market()?;
        info!(
            currencies = market.names.len(),
            path = %self.path,
            "CsvMarketSource: loaded rate matrix"
        );
        Ok(market)
    }
}
