//! # Order Discovery
//!
//! The source has no listing endpoint, only per-order pages keyed by a sequential number, so
//! new orders are found by scanning forward from the highest number already stored.
//!
//! See [`OrderDiscovery::fetch_and_save_new_orders`] for the algorithm.

mod engine;
mod error;
mod progress;

pub use engine::*;
pub use error::*;
pub use progress::*;
