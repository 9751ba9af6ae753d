use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// A progress reporter failed; the scan stops.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Progress reporter failed: {0}")]
pub struct ProgressError(pub String);

/// Called once per batch, before the batch's fetches go out.
///
/// `next_order` is one ahead of the first order number in the batch. The scan waits for
/// the report to finish, so an implementation may persist it.
#[async_trait]
pub trait ScanProgress: Send + Sync {
    async fn report(&self, next_order: u64) -> Result<(), ProgressError>;
}

/// Reports progress to the log.
#[derive(Debug, Clone, Default)]
pub struct LogProgress;

#[async_trait]
impl ScanProgress for LogProgress {
    async fn report(&self, next_order: u64) -> Result<(), ProgressError> {
        info!(next_order, "Checking orders");
        Ok(())
    }
}
