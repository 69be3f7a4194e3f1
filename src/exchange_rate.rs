use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One currency's rate on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Rate", with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(rename = "Date")]
    pub date: String,
}

/// Records decoded from one feed response.
///
/// `date` is the date reported by the feed, which is not necessarily the
/// date that was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct RateBatch {
    pub date: String,
    pub records: Vec<RateRecord>,
}

/// A persisted row: the record plus the key assigned by the store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredRate {
    pub id: i32,
    pub title: String,
    pub code: String,
    pub value: Decimal,
    pub a_date: String,
}

impl From<StoredRate> for RateRecord {
    fn from(row: StoredRate) -> Self {
        Self {
            name: row.title,
            code: row.code,
            rate: row.value,
            date: row.a_date,
        }
    }
}
