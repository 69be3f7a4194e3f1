pub mod config;
pub mod error;
pub mod exchange_rate;
pub mod feed;
pub mod persist;
pub mod query;
pub mod rates_xml;
pub mod routes;
pub mod store;

pub use error::{Error, Result};
pub use exchange_rate::{RateBatch, RateRecord, StoredRate};
