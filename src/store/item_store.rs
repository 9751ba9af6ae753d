use super::StoreResult;
use crate::model::LineItem;
use async_trait::async_trait;

/// Durable storage of discovered line items.
///
/// [`StoreClient`](super::StoreClient) is the production implementation; the discovery
/// engine only sees this trait, so tests can substitute a failing or recording store.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert or fully overwrite the record at `(owner_id, order_number, product_sku)`.
    async fn put(&self, item: LineItem) -> StoreResult<()>;

    /// Highest stored order number for the owner, 0 when there is none.
    ///
    /// Records whose order number is not an integer are ignored.
    async fn max_order_number(&self, owner_id: &str) -> StoreResult<u64>;

    /// All records for the owner, in no particular order.
    async fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<LineItem>>;

    /// Irreversibly delete everything, for every owner.
    async fn reset(&self) -> StoreResult<()>;
}
