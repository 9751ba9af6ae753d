//! Mailbox protocol between [`StoreClient`](super::StoreClient) and [`StoreActor`](super::StoreActor).

use super::StoreError;
use crate::model::LineItem;
use tokio::sync::oneshot;

/// One-shot reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest {
    Put {
        item: LineItem,
        respond_to: Response<()>,
    },
    MaxOrderNumber {
        owner_id: String,
        respond_to: Response<u64>,
    },
    ListByOwner {
        owner_id: String,
        respond_to: Response<Vec<LineItem>>,
    },
    Reset {
        respond_to: Response<()>,
    },
}
