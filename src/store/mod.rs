//! # Item Store
//!
//! Durable line-item storage behind a single actor.
//!
//! - [`StoreActor`] owns the redb [`Session`], opened lazily on first use and torn down by reset.
//! - [`StoreClient`] is the cheap, cloneable handle everyone else uses.
//! - [`ItemStore`] is the seam the discovery engine depends on.

mod actor;
mod client;
mod error;
mod item_store;
mod message;
mod session;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::*;
pub use item_store::ItemStore;
pub use message::{Response, StoreRequest};
pub use session::{Session, StoreLocation};

/// Creates a store actor and its client.
pub fn new(location: StoreLocation) -> (StoreActor, StoreClient) {
    StoreActor::new(32, location)
}
