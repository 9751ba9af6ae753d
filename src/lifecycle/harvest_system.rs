use crate::discovery::{DiscoveryError, OrderDiscovery, ScanProgress, ScanSummary};
use crate::model::LineItem;
use crate::source::OrderSource;
use crate::store::{self, ItemStore, StoreClient, StoreError, StoreLocation};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Runtime that owns the store actor and the discovery engine.
///
/// `HarvestSystem` is responsible for:
/// - **Lifecycle Management**: spawning the store actor and shutting it down
/// - **Dependency Wiring**: handing the engine a [`StoreClient`] and the order source
/// - **Single-flight scans**: at most one scan per owner at a time
///
/// # Example
///
/// ```ignore
/// let system = HarvestSystem::new(StoreLocation::File("orders.redb".into()), source, 5);
/// let summary = system.scan("1234567", Some(&LogProgress)).await?;
/// system.shutdown().await?;
/// ```
pub struct HarvestSystem<R: OrderSource> {
    /// Client for the store actor.
    pub store_client: StoreClient,

    discovery: OrderDiscovery<StoreClient, R>,

    /// One lock per owner with a scan running or waiting.
    scan_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,

    handles: Vec<JoinHandle<()>>,
}

impl<R: OrderSource> HarvestSystem<R> {
    /// Spawns the store actor and wires the engine to it.
    ///
    /// Must be called from within a Tokio runtime. The database is not opened until the
    /// first store request.
    pub fn new(location: StoreLocation, source: R, batch_size: u64) -> Self {
        let (store_actor, store_client) = store::new(location);
        let store_handle = tokio::spawn(store_actor.run());

        let discovery = OrderDiscovery::with_batch_size(store_client.clone(), source, batch_size);

        Self {
            store_client,
            discovery,
            scan_locks: Mutex::new(HashMap::new()),
            handles: vec![store_handle],
        }
    }

    pub fn source(&self) -> &R {
        self.discovery.source()
    }

    /// Discover and store new orders for `owner_id`.
    ///
    /// A concurrent scan for the same owner waits for this one and then resumes from the
    /// new high-water mark.
    pub async fn scan(
        &self,
        owner_id: &str,
        progress: Option<&dyn ScanProgress>,
    ) -> Result<ScanSummary, DiscoveryError> {
        let lock = self.owner_lock(owner_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.discovery.fetch_and_save_new_orders(owner_id, progress).await
        };
        self.release_owner_lock(owner_id, lock).await;
        result
    }

    pub async fn items(&self, owner_id: &str) -> Result<Vec<LineItem>, StoreError> {
        self.store_client.list_by_owner(owner_id).await
    }

    pub async fn max_order_number(&self, owner_id: &str) -> Result<u64, StoreError> {
        self.store_client.max_order_number(owner_id).await
    }

    /// Wipe all stored orders for every owner.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.store_client.reset().await
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping every client closes the store mailbox; the actor then drains and exits.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down harvest system...");

        let Self {
            store_client,
            discovery,
            handles,
            ..
        } = self;
        drop(store_client);
        drop(discovery);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store actor task failed");
                return Err(e);
            }
        }

        info!("Harvest system shutdown complete.");
        Ok(())
    }

    async fn owner_lock(&self, owner_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.scan_locks.lock().await;
        locks.entry(owner_id.to_string()).or_default().clone()
    }

    /// Forget the owner's lock once no other scan holds or waits on it.
    async fn release_owner_lock(&self, owner_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.scan_locks.lock().await;
        // One reference in the map, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(owner_id);
        }
    }
}
