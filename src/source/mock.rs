//! # Mock Order Source
//!
//! A scripted [`OrderSource`] for exercising the discovery engine without a network.
//!
//! ```ignore
//! let source = MockOrderSource::new()
//!     .with_order(1, vec![item_a, item_b])
//!     .with_failure(2, "connection reset");
//!
//! // Unscripted orders come back empty.
//! engine.fetch_and_save_new_orders("42", None).await?;
//! assert_eq!(source.requested(), vec![1, 2, 3, 4, 5]);
//! ```

use super::{OrderSource, SourceError};
use crate::model::LineItem;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Scripted {
    Items(Vec<LineItem>),
    Failure(String),
}

#[derive(Default)]
struct MockState {
    orders: HashMap<u64, Scripted>,
    requested: Vec<u64>,
    missing_credentials: bool,
}

/// Cloneable; every clone shares the same script and request log.
#[derive(Clone, Default)]
pub struct MockOrderSource {
    state: Arc<Mutex<MockState>>,
}

impl MockOrderSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `items` for `order_number`.
    pub fn with_order(self, order_number: u64, items: Vec<LineItem>) -> Self {
        self.lock().orders.insert(order_number, Scripted::Items(items));
        self
    }

    /// Fail every fetch of `order_number`.
    pub fn with_failure(self, order_number: u64, message: impl Into<String>) -> Self {
        self.lock()
            .orders
            .insert(order_number, Scripted::Failure(message.into()));
        self
    }

    /// Make [`OrderSource::preflight`] report missing credentials.
    pub fn without_credentials(self) -> Self {
        self.lock().missing_credentials = true;
        self
    }

    /// Order numbers fetched so far, in call order.
    pub fn requested(&self) -> Vec<u64> {
        self.lock().requested.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OrderSource for MockOrderSource {
    async fn get_order(&self, _owner_id: &str, order_number: u64) -> Result<Vec<LineItem>, SourceError> {
        let mut state = self.lock();
        state.requested.push(order_number);
        match state.orders.get(&order_number) {
            Some(Scripted::Items(items)) => Ok(items.clone()),
            Some(Scripted::Failure(message)) => Err(SourceError::Mock(message.clone())),
            None => Ok(Vec::new()),
        }
    }

    async fn preflight(&self) -> Result<(), SourceError> {
        if self.lock().missing_credentials {
            Err(SourceError::MissingCredentials)
        } else {
            Ok(())
        }
    }
}
