use std::sync::Arc;

use log::error;

use crate::error::{Error, Result};
use crate::exchange_rate::RateRecord;
use crate::store::RateStore;

/// Looks up stored rates by date and optional code.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn RateStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        Self { store }
    }

    /// Returns [`Error::NotFound`] instead of an empty list.
    pub async fn query(&self, date: &str, code: Option<&str>) -> Result<Vec<RateRecord>> {
        let rows = self.store.find(date, code).await.inspect_err(|err| {
            error!("Error querying rates for {}: {}", date, err);
        })?;

        if rows.is_empty() {
            return Err(Error::NotFound);
        }

        Ok(rows.into_iter().map(RateRecord::from).collect())
    }
}
