//! Historical market data acquisition.
//!
//! The pipeline talks to a [`MarketDataProvider`]; [`YahooProvider`] is the
//! production implementation.

mod provider;
pub mod yahoo;

pub use provider::{FetchRequest, MarketDataProvider};
pub use yahoo::{parse_response, YahooProvider};
