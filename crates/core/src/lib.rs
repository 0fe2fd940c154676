pub mod best_rate;
pub mod detector;
pub mod graph;
pub mod traits;

pub use best_rate::{FloydWarshallFinder, RateTable, best_rate, find_best_rate};
pub use detector::{BellmanFordDetector, detect_arbitrage, detect_arbitrage_with};
pub use graph::ExchangeGraph;
