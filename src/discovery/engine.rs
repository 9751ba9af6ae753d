use super::{DiscoveryError, ScanProgress};
use crate::model::LineItem;
use crate::source::OrderSource;
use crate::store::ItemStore;
use futures::future::join_all;
use tracing::{debug, error, info, instrument, warn};

/// Concurrent fetches per batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: u64 = 5;

/// Outcome of one discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Line items written during this run.
    pub total: usize,
    /// One before the cursor where the scan stopped. On the exhaustion path this is
    /// batch-aligned and can differ from the highest order actually seen.
    pub last_order: u64,
}

/// Forward scan over order numbers.
///
/// # Concurrency Model
/// One scan runs batch by batch. Each batch fans out `batch_size` fetches and waits for all of
/// them before anything is written; nothing from batch N+1 is issued until batch N is
/// persisted. Two scans for the same owner must not overlap. That guard lives in
/// [`HarvestSystem`](crate::lifecycle::HarvestSystem), not here.
///
/// There is no mid-scan cancellation. A cooperative flag would be checked at the top of the
/// batch loop, next to the progress report.
pub struct OrderDiscovery<S, R> {
    store: S,
    source: R,
    batch_size: u64,
}

impl<S: ItemStore, R: OrderSource> OrderDiscovery<S, R> {
    pub fn new(store: S, source: R) -> Self {
        Self::with_batch_size(store, source, DEFAULT_BATCH_SIZE)
    }

    /// `batch_size` is clamped to at least 1.
    pub fn with_batch_size(store: S, source: R, batch_size: u64) -> Self {
        Self {
            store,
            source,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    /// Fetch orders past the owner's high-water mark and store their items.
    ///
    /// The source's preflight runs first, so missing credentials fail with
    /// [`DiscoveryError::Source`] before any order is fetched. Store and progress failures
    /// abort the scan. Whatever was written before the failure stays written, so running
    /// again picks up where this run stopped.
    #[instrument(skip(self, progress))]
    pub async fn fetch_and_save_new_orders(
        &self,
        owner_id: &str,
        progress: Option<&dyn ScanProgress>,
    ) -> Result<ScanSummary, DiscoveryError> {
        match self.scan(owner_id, progress).await {
            Ok(summary) => {
                info!(total = summary.total, last_order = summary.last_order, "Scan finished");
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "Scan failed");
                Err(e)
            }
        }
    }

    async fn scan(
        &self,
        owner_id: &str,
        progress: Option<&dyn ScanProgress>,
    ) -> Result<ScanSummary, DiscoveryError> {
        self.source.preflight().await?;

        let last_saved = self.store.max_order_number(owner_id).await?;
        let mut current = last_saved + 1;
        let mut total = 0;
        info!(start = current, batch_size = self.batch_size, "Scanning for new orders");

        loop {
            if let Some(progress) = progress {
                progress.report(current + 1).await?;
            }

            let batch = (0..self.batch_size).map(|i| self.fetch_or_empty(owner_id, current + i));
            let results = join_all(batch).await;

            let mut has_valid_orders = false;
            for (i, items) in results.into_iter().enumerate() {
                if items.is_empty() {
                    if i == 0 {
                        return Ok(ScanSummary {
                            total,
                            last_order: current - 1,
                        });
                    }
                    // Anything after a gap is treated as past the end.
                    debug!(order = current + i as u64, "Gap inside batch");
                    break;
                }

                let count = items.len();
                for item in items {
                    self.store.put(item).await?;
                }
                total += count;
                has_valid_orders = true;
            }

            if !has_valid_orders {
                break;
            }
            current += self.batch_size;
        }

        Ok(ScanSummary {
            total,
            last_order: current - 1,
        })
    }

    async fn fetch_or_empty(&self, owner_id: &str, order_number: u64) -> Vec<LineItem> {
        match self.source.get_order(owner_id, order_number).await {
            Ok(items) => items,
            Err(e) => {
                warn!(order = order_number, error = %e, "Fetch failed, treating order as absent");
                Vec::new()
            }
        }
    }
}
