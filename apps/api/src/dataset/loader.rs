//! Dataset loader: brings the business dataset into memory exactly once.
//!
//! `DatasetCache` owns a single-flight slot: the first caller starts the load,
//! every caller arriving while it is in flight awaits the same shared future,
//! and all of them resolve (or fail) together. A failed load empties the slot
//! so the next call reads the source again.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{error, info};

use crate::dataset::{parse_records, Dataset, DatasetLoadError};

/// Where the dataset comes from. `CsvFileSource` in production.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn read(&self) -> Result<Dataset, DatasetLoadError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Reads the dataset from a CSV file on local storage.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for CsvFileSource {
    async fn read(&self) -> Result<Dataset, DatasetLoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DatasetLoadError::Io {
                path: self.path.clone(),
                source: Arc::new(e),
            })?;

        // Parsing tens of thousands of rows is CPU work; keep it off the reactor.
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || parse_records(&path, &bytes))
            .await
            .map_err(|e| DatasetLoadError::Task(e.to_string()))?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

type PendingLoad = Shared<BoxFuture<'static, Result<Arc<Dataset>, DatasetLoadError>>>;

enum Slot {
    Empty,
    Loading(PendingLoad),
    Ready(Arc<Dataset>),
}

/// Process-wide dataset cache, handed to consumers through `AppState`.
pub struct DatasetCache {
    source: Arc<dyn DatasetSource>,
    slot: Mutex<Slot>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(Slot::Empty),
        }
    }

    /// Returns the cached dataset, loading it on first use.
    ///
    /// Every successful call returns the same `Arc`.
    pub async fn load(&self) -> Result<Arc<Dataset>, DatasetLoadError> {
        let pending = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match &*slot {
                Slot::Ready(dataset) => return Ok(Arc::clone(dataset)),
                Slot::Loading(pending) => pending.clone(),
                Slot::Empty => {
                    let pending = self.start_load();
                    *slot = Slot::Loading(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;
        self.settle(&pending, &result);
        result
    }

    /// True once a load has completed successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner),
            Slot::Ready(_)
        )
    }

    fn start_load(&self) -> PendingLoad {
        let source = Arc::clone(&self.source);
        async move {
            let location = source.describe();
            match source.read().await {
                Ok(records) => {
                    info!("Loaded business dataset with {} rows from {location}", records.len());
                    Ok(Arc::new(records))
                }
                Err(e) => {
                    error!("Failed to load business dataset: {e}");
                    Err(e)
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Moves the slot out of `Loading` once the load this caller awaited has finished.
    /// Only the matching in-flight load may transition the slot; later loads are left alone.
    fn settle(&self, pending: &PendingLoad, result: &Result<Arc<Dataset>, DatasetLoadError>) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let is_current = matches!(&*slot, Slot::Loading(current) if current.ptr_eq(pending));
        if !is_current {
            return;
        }
        *slot = match result {
            Ok(dataset) => Slot::Ready(Arc::clone(dataset)),
            Err(_) => Slot::Empty,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::dataset::BusinessRecord;

    /// Counts reads and holds each one open briefly so concurrent callers overlap.
    struct CountingSource {
        reads: AtomicUsize,
        fail_first: usize,
    }

    impl CountingSource {
        fn new(fail_first: usize) -> Arc<Self> {
            Arc::new(Self {
                reads: AtomicUsize::new(0),
                fail_first,
            })
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DatasetSource for CountingSource {
        async fn read(&self) -> Result<Dataset, DatasetLoadError> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if n < self.fail_first {
                return Err(DatasetLoadError::Parse {
                    path: PathBuf::from("counting"),
                    message: "boom".to_string(),
                });
            }
            Ok(vec![BusinessRecord {
                business_name: "Acme".to_string(),
                ..Default::default()
            }])
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_read() {
        let source = CountingSource::new(0);
        let cache = DatasetCache::new(source.clone());

        let results = futures::future::join_all((0..8).map(|_| cache.load())).await;

        assert_eq!(source.reads(), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }
        assert!(cache.is_loaded());
    }

    #[tokio::test]
    async fn test_loads_across_tasks_share_one_read() {
        let source = CountingSource::new(0);
        let cache = Arc::new(DatasetCache::new(source.clone()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.load().await })
            })
            .collect();

        let mut datasets = Vec::new();
        for handle in handles {
            datasets.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(source.reads(), 1);
        assert!(datasets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_cached_dataset_is_served_without_rereading() {
        let source = CountingSource::new(0);
        let cache = DatasetCache::new(source.clone());

        let first = cache.load().await.unwrap();
        let second = cache.load().await.unwrap();

        assert_eq!(source.reads(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_callers_fail_together() {
        let source = CountingSource::new(1);
        let cache = DatasetCache::new(source.clone());

        let (a, b) = tokio::join!(cache.load(), cache.load());

        assert!(a.is_err());
        assert!(b.is_err());
        assert_eq!(source.reads(), 1);
        assert!(!cache.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_is_retried_on_next_call() {
        let source = CountingSource::new(1);
        let cache = DatasetCache::new(source.clone());

        assert!(cache.load().await.is_err());
        let dataset = cache.load().await.unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(source.reads(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_then_created_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("business_dataset.csv");
        let cache = DatasetCache::new(Arc::new(CsvFileSource::new(&path)));

        let err = cache.load().await.unwrap_err();
        assert!(matches!(err, DatasetLoadError::Io { .. }), "got {err:?}");

        std::fs::write(&path, "BUSINESS NAME,MAILING CITY\nAcme,Austin\nBolt,Dallas\n").unwrap();

        let dataset = cache.load().await.unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[1].city, "Dallas");
    }
}
