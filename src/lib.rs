//! # Order Harvest
//!
//! > **Find every order a shop knows about, when all it gives you is one page per order.**
//!
//! The source has no "list my orders" API. It only serves a detail page per order, addressed
//! by `{owner}-{NNNN}` with a sequential number. This crate scans those numbers forward from
//! the last one it has seen, batches the requests, and stores every line item it finds.
//!
//! ## 🏗️ Design
//!
//! ### The scan
//! [`OrderDiscovery`](discovery::OrderDiscovery) resumes at the stored high-water mark + 1 and
//! fetches `batch_size` orders at a time. An empty order at the start of a batch ends the
//! series; an empty order later in a batch ends that batch. A failed fetch counts as empty:
//! one flaky request never aborts a scan, and a store failure always does.
//!
//! ### The store
//! A single [`StoreActor`](store::StoreActor) owns the redb database. It opens it on the
//! first request and drops it on reset. Everyone else holds a cheap
//! [`StoreClient`](store::StoreClient), so concurrent callers share one session without locks.
//!
//! ### The source
//! [`HttpOrderSource`](source::HttpOrderSource) fetches pages with an injected session
//! cookie, pulls the JSON out of `data-state` attributes and flattens
//! shipment → line → seller → product into [`LineItem`](model::LineItem)s.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: the `LineItem` record and order-number formatting.
//! - [`store`]: the actor-backed item store and the [`ItemStore`](store::ItemStore) seam.
//! - [`source`]: the [`OrderSource`](source::OrderSource) seam, the HTTP implementation and a mock.
//! - [`discovery`]: the scan itself.
//! - [`lifecycle`]: [`HarvestSystem`](lifecycle::HarvestSystem) wiring and per-owner single-flight, plus tracing setup.
//! - [`config`]: environment configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! HARVEST_COOKIE='__Secure-access-token=...' RUST_LOG=info cargo run -- scan
//! cargo run -- list --owner 1234567
//! ```

pub mod config;
pub mod discovery;
pub mod lifecycle;
pub mod model;
pub mod source;
pub mod store;
