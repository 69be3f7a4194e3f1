#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kurs::feed::RateSource;
use kurs::rates_xml;
use kurs::store::{MemoryStore, RateStore};
use kurs::{Error, RateBatch, RateRecord, Result, StoredRate};
use rust_decimal::Decimal;

/// Wraps a [`MemoryStore`], counting calls and failing chosen codes.
#[derive(Default)]
pub struct TestStore {
    pub inner: MemoryStore,
    pub fail_codes: HashSet<String>,
    pub panic_codes: HashSet<String>,
    pub fail_reads: bool,
    pub write_delay: Option<Duration>,
    pub inserts_started: AtomicUsize,
    pub inserts_finished: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub finds: AtomicUsize,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(codes: &[&str]) -> Self {
        Self {
            fail_codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn panicking(codes: &[&str]) -> Self {
        Self {
            panic_codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn broken_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn started(&self) -> usize {
        self.inserts_started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.inserts_finished.load(Ordering::SeqCst)
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateStore for TestStore {
    async fn insert(&self, record: &RateRecord, date: &str) -> Result<i32> {
        self.inserts_started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inserts_finished.fetch_add(1, Ordering::SeqCst);

        if self.panic_codes.contains(&record.code) {
            panic!("writer crashed on {}", record.code);
        }
        if self.fail_codes.contains(&record.code) {
            return Err(Error::Store(sqlx::Error::Protocol(format!(
                "rejected {}",
                record.code
            ))));
        }

        self.inner.insert(record, date).await
    }

    async fn find(&self, date: &str, code: Option<&str>) -> Result<Vec<StoredRate>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(Error::Store(sqlx::Error::PoolTimedOut));
        }
        self.inner.find(date, code).await
    }
}

/// Serves a fixed XML document and remembers the parameters it was asked for.
pub struct StubFeed {
    xml: String,
    pub requested: Mutex<Vec<String>>,
}

impl StubFeed {
    pub fn new(xml: impl Into<String>) -> Self {
        Self {
            xml: xml.into(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateSource for StubFeed {
    async fn fetch(&self, date_param: &str) -> Result<RateBatch> {
        self.requested.lock().unwrap().push(date_param.to_string());
        rates_xml::decode(&self.xml)
    }
}

pub fn record(name: &str, code: &str, rate: Decimal, date: &str) -> RateRecord {
    RateRecord {
        name: name.to_string(),
        code: code.to_string(),
        rate,
        date: date.to_string(),
    }
}

pub fn batch(date: &str, codes: &[&str]) -> RateBatch {
    RateBatch {
        date: date.to_string(),
        records: codes
            .iter()
            .enumerate()
            .map(|(i, code)| record(&format!("{} currency", code), code, Decimal::new(100 + i as i64, 0), date))
            .collect(),
    }
}

pub fn feed_xml(date: &str, items: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rates>\n<generator>zhExchangeRates</generator>\n<date>{}</date>\n",
        date
    );
    for (name, code, value) in items {
        xml.push_str(&format!(
            "<item><fullname>{}</fullname><title>{}</title><description>{}</description><quant>1</quant><index>UP</index><change>0.00</change></item>\n",
            name, code, value
        ));
    }
    xml.push_str("</rates>");
    xml
}
