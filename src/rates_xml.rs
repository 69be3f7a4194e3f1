use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::exchange_rate::{RateBatch, RateRecord};

#[derive(Debug, Deserialize, PartialEq)]
pub struct RateItem {
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "title")]
    pub code: String,
    #[serde(rename = "description")]
    pub value: String,
}

/// Root `<rates>` element of the feed. Channel metadata is ignored.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Rates {
    #[serde(default)]
    pub date: String,
    #[serde(rename = "item", default)]
    pub items: Vec<RateItem>,
}

/// Decodes a feed document into a batch stamped with the document's date.
pub fn decode(xml: &str) -> Result<RateBatch> {
    let rates: Rates = quick_xml::de::from_str(xml)?;
    let records = rates
        .items
        .into_iter()
        .map(|item| {
            let rate = parse_rate(&item.value)?;
            Ok(RateRecord {
                name: item.full_name,
                code: item.code,
                rate,
                date: rates.date.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RateBatch {
        date: rates.date,
        records,
    })
}

fn parse_rate(s: &str) -> Result<Decimal> {
    let normalized = normalize_decimal_string(s.trim());
    Decimal::from_str(&normalized)
        .map_err(|err| Error::Decode(format!("invalid rate '{}': {}", s, err)))
}

fn normalize_decimal_string(s: &str) -> String {
    s.replace(',', ".")
}
