use super::message::{Response, StoreRequest};
use super::{ItemStore, StoreError, StoreResult};
use crate::model::LineItem;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Cloneable handle to the [`StoreActor`](super::StoreActor).
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(&self, build: impl FnOnce(Response<T>) -> StoreRequest) -> StoreResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }
}

#[async_trait]
impl ItemStore for StoreClient {
    #[instrument(skip_all, fields(owner = %item.owner_id, order = %item.order_number))]
    async fn put(&self, item: LineItem) -> StoreResult<()> {
        self.call(|respond_to| StoreRequest::Put { item, respond_to }).await
    }

    #[instrument(skip(self))]
    async fn max_order_number(&self, owner_id: &str) -> StoreResult<u64> {
        let owner_id = owner_id.to_string();
        self.call(|respond_to| StoreRequest::MaxOrderNumber { owner_id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<LineItem>> {
        let owner_id = owner_id.to_string();
        self.call(|respond_to| StoreRequest::ListByOwner { owner_id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> StoreResult<()> {
        self.call(|respond_to| StoreRequest::Reset { respond_to }).await
    }
}
