//! # Remote Order Source
//!
//! Given an owner and an order number, produce that order's line items.
//!
//! - [`OrderSource`] is the seam the discovery engine depends on.
//! - [`HttpOrderSource`] reads the authenticated order-detail pages.
//! - [`MockOrderSource`] is a scripted stand-in for tests.

pub mod credentials;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod http;
pub mod mock;

pub use credentials::*;
pub use error::*;
pub use http::{HttpOrderSource, SourceConfig};
pub use mock::MockOrderSource;

use crate::model::LineItem;
use async_trait::async_trait;

#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Line items of one order.
    ///
    /// An order that does not exist yields `Ok(vec![])`. Network, HTTP and credential
    /// problems are reported as [`SourceError`] so callers can tell them apart.
    async fn get_order(&self, owner_id: &str, order_number: u64) -> Result<Vec<LineItem>, SourceError>;

    /// Checks that must pass before a scan starts, such as having a session at all.
    async fn preflight(&self) -> Result<(), SourceError> {
        Ok(())
    }
}
