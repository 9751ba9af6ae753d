//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber driven by `RUST_LOG`.
//!
//! ```bash
//! # Batch progress and scan summaries
//! RUST_LOG=info harvest scan
//!
//! # Every fetch and store request
//! RUST_LOG=debug harvest scan
//!
//! # Only the engine
//! RUST_LOG=order_harvest::discovery=debug harvest scan
//! ```
//!
//! Fields are structured (`owner`, `order`, `total`, `last_order`), and the engine and store
//! client open spans, so a failed put shows up nested under the scan that issued it:
//!
//! ```text
//! INFO fetch_and_save_new_orders: Scanning for new orders owner_id="1234567" start=8 batch_size=5
//! WARN fetch_and_save_new_orders: Fetch failed, treating order as absent order=9 error=HTTP 502 ...
//! INFO fetch_and_save_new_orders: Scan finished total=3 last_order=7
//! ```

/// Installs the global subscriber. Call once, from the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
