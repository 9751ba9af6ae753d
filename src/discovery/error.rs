//! Error types for order discovery.

use super::ProgressError;
use crate::source::SourceError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that end a scan.
///
/// Individual fetch failures never show up here; the engine treats them as empty orders.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// The source refused to start, e.g. no session credentials.
    #[error(transparent)]
    Source(#[from] SourceError),
}
