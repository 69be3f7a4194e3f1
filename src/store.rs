use std::sync::Mutex;

use async_trait::async_trait;
use log::info;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DbConfig;
use crate::error::{Error, Result};
use crate::exchange_rate::{RateRecord, StoredRate};

/// Persistence port for rate rows.
///
/// Implementations must accept concurrent inserts from many tasks.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Writes one row and returns the key assigned to it.
    async fn insert(&self, record: &RateRecord, date: &str) -> Result<i32>;

    /// Rows stored for `date`, restricted to `code` when given.
    async fn find(&self, date: &str, code: Option<&str>) -> Result<Vec<StoredRate>>;
}

/// PostgreSQL-backed store sharing one pool across all callers.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await?;
        info!(
            "Connected to PostgreSQL at {}:{}/{}",
            config.host, config.port, config.db_name
        );

        Ok(Self::new(pool))
    }

    pub async fn create_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            create table if not exists r_currency (
                id serial primary key,
                title varchar(60) not null,
                code varchar(3) not null,
                value numeric(18, 2) not null,
                a_date varchar(60) not null
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RateStore for PgStore {
    async fn insert(&self, record: &RateRecord, date: &str) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            insert into
                r_currency (title, code, value, a_date)
            values
                ($1, $2, $3, $4)
            returning id
            "#,
        )
        .bind(&record.name)
        .bind(&record.code)
        .bind(record.rate)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find(&self, date: &str, code: Option<&str>) -> Result<Vec<StoredRate>> {
        let rows = match code {
            Some(code) => {
                sqlx::query_as::<_, StoredRate>(
                    r#"
                    select
                        id, title, code, value, a_date
                    from
                        r_currency
                    where
                        a_date = $1
                    and
                        code = $2
                    order by
                        id
                    "#,
                )
                .bind(date)
                .bind(code)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StoredRate>(
                    r#"
                    select
                        id, title, code, value, a_date
                    from
                        r_currency
                    where
                        a_date = $1
                    order by
                        id
                    "#,
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }
}

/// In-process store, selected with `"Store": "Memory"`. Rows live as
/// long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredRate>>> {
        self.rows
            .lock()
            .map_err(|_| Error::Store(sqlx::Error::WorkerCrashed))
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn insert(&self, record: &RateRecord, date: &str) -> Result<i32> {
        let mut rows = self.lock()?;
        let id = rows.last().map_or(1, |row| row.id + 1);
        rows.push(StoredRate {
            id,
            title: record.name.clone(),
            code: record.code.clone(),
            value: record.rate,
            a_date: date.to_string(),
        });

        Ok(id)
    }

    async fn find(&self, date: &str, code: Option<&str>) -> Result<Vec<StoredRate>> {
        let rows = self.lock()?;
        Ok(rows
            .iter()
            .filter(|row| row.a_date == date)
            .filter(|row| code.is_none_or(|code| row.code == code))
            .cloned()
            .collect())
    }
}
