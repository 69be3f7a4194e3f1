use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::error::Result;
use crate::exchange_rate::RateBatch;
use crate::rates_xml;

pub const DEFAULT_BASE_URL: &str = "https://nationalbank.kz/rss/get_rates.cfm";

/// A source of rate batches.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the batch for `date_param`. The parameter is handed to the
    /// upstream as is.
    async fn fetch(&self, date_param: &str) -> Result<RateBatch>;
}

/// Client for the National Bank of Kazakhstan rates feed.
#[derive(Debug, Clone)]
pub struct NbkFeed {
    client: Client,
    base_url: String,
}

impl NbkFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, date_param: &str) -> String {
        format!("{}?fdate={}", self.base_url, date_param)
    }

    async fn load_xml(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let text = resp.text().await?;

        Ok(text)
    }
}

impl Default for NbkFeed {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl RateSource for NbkFeed {
    async fn fetch(&self, date_param: &str) -> Result<RateBatch> {
        let url = self.url(date_param);
        debug!("Fetching rates from {}", url);

        let text = self.load_xml(&url).await?;
        let batch = rates_xml::decode(&text)?;
        debug!(
            "Decoded {} rates for {} (requested {})",
            batch.records.len(),
            batch.date,
            date_param
        );

        Ok(batch)
    }
}
