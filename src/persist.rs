use std::sync::Arc;

use log::{error, info};
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::exchange_rate::RateBatch;
use crate::store::RateStore;

/// Writes every record of a batch concurrently, one task per record.
///
/// Writes are not transactional: rows written before a failure stay
/// committed. The call returns only after every write has finished, and
/// reports the first error drained from the result channel, if any.
/// Dropping the returned future detaches the writes; they still run to
/// completion.
#[derive(Clone)]
pub struct BatchPersister {
    store: Arc<dyn RateStore>,
}

impl BatchPersister {
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        Self { store }
    }

    pub async fn persist(&self, batch: RateBatch) -> Result<()> {
        let RateBatch { date, records } = batch;
        let total = records.len();
        if total == 0 {
            return Ok(());
        }

        let (tx, mut rx) = mpsc::channel::<Result<()>>(total);
        let mut writes = Vec::with_capacity(total);

        for record in records {
            let store = Arc::clone(&self.store);
            let date = date.clone();
            let tx = tx.clone();
            writes.push(tokio::spawn(async move {
                let result = match store.insert(&record, &date).await {
                    Ok(_) => Ok(()),
                    Err(err) => {
                        error!("Error saving {} for {}: {}", record.code, date, err);
                        Err(Error::Persist(err.to_string()))
                    }
                };
                let _ = tx.send(result).await;
            }));
        }

        for write in writes {
            if let Err(err) = write.await {
                error!("Write task for {} did not complete: {}", date, err);
                let _ = tx.send(Err(Error::Persist(err.to_string()))).await;
            }
        }
        drop(tx);

        let mut first_error = None;
        let mut failed = 0;
        while let Some(result) = rx.recv().await {
            if let Err(err) = result {
                failed += 1;
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => {
                error!("{} of {} rates for {} were not saved", failed, total, date);
                Err(err)
            }
            None => {
                info!("Saved {} rates for {}", total, date);
                Ok(())
            }
        }
    }
}
