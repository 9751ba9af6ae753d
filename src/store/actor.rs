use super::message::StoreRequest;
use super::session::{Session, StoreLocation};
use super::{StoreClient, StoreResult};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Task that owns the store session.
///
/// # Concurrency Model
/// Every [`StoreClient`] clone talks to the same mailbox, and requests are served one at a
/// time. The session is opened by whichever request arrives first, so racing callers all
/// end up on a single handle without any locking.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    location: StoreLocation,
    session: Option<Session>,
}

impl StoreActor {
    pub fn new(buffer_size: usize, location: StoreLocation) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            location,
            session: None,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the mailbox loop until every client is dropped.
    pub async fn run(mut self) {
        info!(location = %self.location, "Store actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Put { item, respond_to } => {
                    debug!(owner = %item.owner_id, order = %item.order_number, sku = %item.product_sku, "Put");
                    let result = self.session().and_then(|s| s.put(&item));
                    if let Err(e) = &result {
                        warn!(owner = %item.owner_id, order = %item.order_number, error = %e, "Put failed");
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::MaxOrderNumber { owner_id, respond_to } => {
                    let result = self.session().and_then(|s| s.max_order_number(&owner_id));
                    match &result {
                        Ok(max) => debug!(owner = %owner_id, max, "MaxOrderNumber"),
                        Err(e) => warn!(owner = %owner_id, error = %e, "MaxOrderNumber failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::ListByOwner { owner_id, respond_to } => {
                    let result = self.session().and_then(|s| s.list_by_owner(&owner_id));
                    match &result {
                        Ok(items) => debug!(owner = %owner_id, count = items.len(), "ListByOwner"),
                        Err(e) => warn!(owner = %owner_id, error = %e, "ListByOwner failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Reset { respond_to } => {
                    let result = self.reset();
                    match &result {
                        Ok(()) => info!(location = %self.location, "Store reset"),
                        Err(e) => warn!(location = %self.location, error = %e, "Reset failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(location = %self.location, "Store actor shutdown");
    }

    fn session(&mut self) -> StoreResult<&Session> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                info!(location = %self.location, "Opening store session");
                Session::open(&self.location)?
            }
        };
        Ok(self.session.insert(session))
    }

    fn reset(&mut self) -> StoreResult<()> {
        // Invalidate our own handle before touching the file.
        self.session = None;
        match &self.location {
            StoreLocation::InMemory => Ok(()),
            StoreLocation::File(path) => Session::destroy(path),
        }
    }
}
